use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::models::{
    Appointment, AppointmentFields, AppointmentFilter, AppointmentStatus,
    AppointmentWithCustomer, Customer, CustomerFields,
};

/// Fixed-width UTC text, so string order is time order and equal instants
/// give equal keys in the unique index.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

const APPOINTMENT_SELECT_SQL: &str = "SELECT a.id, a.customer_id, a.date_time, a.status, c.id, c.name, c.email
     FROM appointments a
     LEFT JOIN customers c ON c.id = a.customer_id";

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> StoreResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::InvalidData(format!("timestamp '{s}': {e}")))
}

fn parse_uuid(s: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("id '{s}': {e}")))
}

// ── Customers ──

pub fn create_customer(conn: &Connection, customer: &Customer) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO customers (id, name, email) VALUES (?1, ?2, ?3)",
        params![customer.id.to_string(), customer.name, customer.email],
    )?;
    tracing::info!(customer_id = %customer.id, "customer created");
    Ok(())
}

pub fn get_customer(conn: &Connection, id: &Uuid) -> StoreResult<Customer> {
    let result = conn.query_row(
        "SELECT id, name, email FROM customers WHERE id = ?1",
        params![id.to_string()],
        |row| Ok(parse_customer_row(row, 0)),
    );

    match result {
        Ok(customer) => customer,
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound {
            entity: "customer",
            id: id.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn list_customers(conn: &Connection) -> StoreResult<Vec<Customer>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM customers")?;
    let rows = stmt.query_map([], |row| Ok(parse_customer_row(row, 0)))?;

    let mut customers = vec![];
    for row in rows {
        customers.push(row??);
    }
    Ok(customers)
}

pub fn update_customer(conn: &Connection, id: &Uuid, fields: &CustomerFields) -> StoreResult<()> {
    let count = conn.execute(
        "UPDATE customers SET name = ?1, email = ?2 WHERE id = ?3",
        params![fields.name, fields.email, id.to_string()],
    )?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "customer",
            id: id.to_string(),
        });
    }
    tracing::info!(customer_id = %id, "customer updated");
    Ok(())
}

/// Removes the customer. Appointments referencing it are left in place.
pub fn delete_customer(conn: &Connection, id: &Uuid) -> StoreResult<()> {
    let count = conn.execute("DELETE FROM customers WHERE id = ?1", params![id.to_string()])?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "customer",
            id: id.to_string(),
        });
    }
    tracing::info!(customer_id = %id, "customer deleted");
    Ok(())
}

fn parse_customer_row(row: &Row, offset: usize) -> StoreResult<Customer> {
    let id: String = row.get(offset)?;
    Ok(Customer {
        id: parse_uuid(&id)?,
        name: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
    })
}

// ── Appointments ──

/// Inserts the appointment. A second booking for the same customer at the
/// same instant fails with [`StoreError::ConstraintViolation`].
pub fn create_appointment(conn: &Connection, appointment: &Appointment) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO appointments (id, customer_id, date_time, status) VALUES (?1, ?2, ?3, ?4)",
        params![
            appointment.id.to_string(),
            appointment.customer_id.to_string(),
            format_timestamp(&appointment.date_time),
            appointment.status.as_str(),
        ],
    )?;
    tracing::info!(
        appointment_id = %appointment.id,
        customer_id = %appointment.customer_id,
        "appointment created"
    );
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> StoreResult<AppointmentWithCustomer> {
    let result = conn.query_row(
        &format!("{APPOINTMENT_SELECT_SQL} WHERE a.id = ?1"),
        params![id.to_string()],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appointment) => appointment,
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn list_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> StoreResult<Vec<AppointmentWithCustomer>> {
    let mut clauses: Vec<&str> = vec![];
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

    if let Some(from) = &filter.from {
        params_vec.push(Box::new(format_timestamp(from)));
        clauses.push("a.date_time >= ?");
    }
    if let Some(to) = &filter.to {
        params_vec.push(Box::new(format_timestamp(to)));
        clauses.push("a.date_time <= ?");
    }
    if let Some(status) = &filter.status {
        params_vec.push(Box::new(status.as_str()));
        clauses.push("a.status = ?");
    }

    let sql = if clauses.is_empty() {
        APPOINTMENT_SELECT_SQL.to_string()
    } else {
        format!("{APPOINTMENT_SELECT_SQL} WHERE {}", clauses.join(" AND "))
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn update_appointment(
    conn: &Connection,
    id: &Uuid,
    fields: &AppointmentFields,
) -> StoreResult<()> {
    let count = conn.execute(
        "UPDATE appointments SET customer_id = ?1, date_time = ?2, status = ?3 WHERE id = ?4",
        params![
            fields.customer_id.to_string(),
            format_timestamp(&fields.date_time),
            fields.status.as_str(),
            id.to_string(),
        ],
    )?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        });
    }
    tracing::info!(appointment_id = %id, status = %fields.status, "appointment updated");
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> StoreResult<()> {
    let count = conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    if count == 0 {
        return Err(StoreError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        });
    }
    tracing::info!(appointment_id = %id, "appointment deleted");
    Ok(())
}

fn parse_appointment_row(row: &Row) -> StoreResult<AppointmentWithCustomer> {
    let id: String = row.get(0)?;
    let customer_id: String = row.get(1)?;
    let date_time: String = row.get(2)?;
    let status: String = row.get(3)?;
    let joined_id: Option<String> = row.get(4)?;

    let appointment = Appointment {
        id: parse_uuid(&id)?,
        customer_id: parse_uuid(&customer_id)?,
        date_time: parse_timestamp(&date_time)?,
        status: status
            .parse::<AppointmentStatus>()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?,
    };

    let customer = match joined_id {
        Some(_) => Some(parse_customer_row(row, 4)?),
        None => None,
    };

    Ok(AppointmentWithCustomer {
        appointment,
        customer,
    })
}
