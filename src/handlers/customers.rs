use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::parse_id;
use crate::db::{queries, Session};
use crate::errors::AppError;
use crate::models::{Customer, CustomerInput};

// GET /api/customers
pub async fn list_customers(session: Session) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(queries::list_customers(&session)?))
}

// GET /api/customers/:id
pub async fn get_customer(
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_id(&raw_id, "customer")?;
    Ok(Json(queries::get_customer(&session, &id)?))
}

// POST /api/customers
pub async fn create_customer(
    session: Session,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;
    let customer = Customer::new(input.validate()?);

    queries::create_customer(&session, &customer)?;

    let location = format!("/api/customers/{}", customer.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(customer),
    )
        .into_response())
}

// PUT /api/customers/:id
pub async fn update_customer(
    session: Session,
    Path(raw_id): Path<String>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id, "customer")?;
    let Json(input) = payload?;
    let fields = input.validate()?;

    queries::update_customer(&session, &id, &fields)?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/customers/:id
pub async fn delete_customer(
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id, "customer")?;
    queries::delete_customer(&session, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
