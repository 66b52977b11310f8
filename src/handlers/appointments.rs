use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::parse_id;
use crate::db::{queries, Session};
use crate::errors::AppError;
use crate::models::appointment::parse_date_bound;
use crate::models::{
    Appointment, AppointmentFilter, AppointmentInput, AppointmentStatus, AppointmentWithCustomer,
};

// GET /api/appointments
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
}

/// Outcome of turning query parameters into a filter. A status outside the
/// known set cannot match any stored row.
enum ParsedQuery {
    Filter(AppointmentFilter),
    MatchesNothing,
}

impl AppointmentsQuery {
    fn parse(self) -> Result<ParsedQuery, AppError> {
        let bound = |raw: Option<String>, name: &str| -> Result<_, AppError> {
            match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => parse_date_bound(s)
                    .map(Some)
                    .ok_or_else(|| AppError::BadRequest(format!("'{s}' is not a valid {name}"))),
                None => Ok(None),
            }
        };

        let from = bound(self.from, "from")?;
        let to = bound(self.to, "to")?;

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<AppointmentStatus>() {
                Ok(status) => Some(status),
                Err(_) => return Ok(ParsedQuery::MatchesNothing),
            },
        };

        Ok(ParsedQuery::Filter(AppointmentFilter { from, to, status }))
    }
}

pub async fn list_appointments(
    session: Session,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<AppointmentWithCustomer>>, AppError> {
    let appointments = match query.parse()? {
        ParsedQuery::Filter(filter) => queries::list_appointments(&session, &filter)?,
        ParsedQuery::MatchesNothing => vec![],
    };
    Ok(Json(appointments))
}

// GET /api/appointments/:id
pub async fn get_appointment(
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Json<AppointmentWithCustomer>, AppError> {
    let id = parse_id(&raw_id, "appointment")?;
    Ok(Json(queries::get_appointment(&session, &id)?))
}

// POST /api/appointments
pub async fn create_appointment(
    session: Session,
    payload: Result<Json<AppointmentInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;
    let appointment = Appointment::new(input.validate()?);

    if let Err(e) = queries::create_appointment(&session, &appointment) {
        tracing::warn!(
            customer_id = %appointment.customer_id,
            date_time = %appointment.date_time,
            "appointment rejected: {e}"
        );
        return Err(e.into());
    }

    let created = queries::get_appointment(&session, &appointment.id)?;
    let location = format!("/api/appointments/{}", appointment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

// PUT /api/appointments/:id
pub async fn update_appointment(
    session: Session,
    Path(raw_id): Path<String>,
    payload: Result<Json<AppointmentInput>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id, "appointment")?;
    let Json(input) = payload?;
    let fields = input.validate()?;

    queries::update_appointment(&session, &id, &fields)?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/appointments/:id
pub async fn delete_appointment(
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id, "appointment")?;
    queries::delete_appointment(&session, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
