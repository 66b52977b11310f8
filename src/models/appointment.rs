use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::Customer;
use super::validation::{require, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Done,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Done => "done",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "done" => Ok(AppointmentStatus::Done),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn new(fields: AppointmentFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: fields.customer_id,
            date_time: fields.date_time,
            status: fields.status,
        }
    }
}

/// An appointment joined with the customer it references. `customer` is
/// `None` when that customer has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentWithCustomer {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentFields {
    pub customer_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Request body for creating or replacing an appointment. Fields are kept as
/// raw strings so that bad values surface as field-level validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub customer_id: Option<String>,
    pub date_time: Option<String>,
    pub status: Option<String>,
}

impl AppointmentInput {
    pub fn validate(self) -> Result<AppointmentFields, ValidationError> {
        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => AppointmentStatus::default(),
        };

        let raw_customer_id = require(self.customer_id, "customerId")?;
        let customer_id = Uuid::parse_str(raw_customer_id.trim())
            .map_err(|_| ValidationError::InvalidId(raw_customer_id.clone(), "customerId"))?;

        let raw_date_time = require(self.date_time, "dateTime")?;
        let date_time = parse_date_time(&raw_date_time)
            .ok_or_else(|| ValidationError::InvalidTimestamp(raw_date_time.clone(), "dateTime"))?;

        Ok(AppointmentFields {
            customer_id,
            date_time,
            status,
        })
    }
}

/// Conjunctive filter for listing appointments. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
}

/// Timestamps are stored as text that sorts in time order only for
/// four-digit years.
fn within_storable_years(dt: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&dt.year())
}

/// Parses an RFC 3339 timestamp. A timestamp without an offset is taken as UTC.
/// Instants outside years 0000-9999 (after conversion to UTC) are rejected.
pub fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let parsed = match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc()),
    };
    parsed.filter(within_storable_years)
}

/// Like [`parse_date_time`], but also accepts a bare date as midnight UTC.
pub fn parse_date_bound(s: &str) -> Option<DateTime<Utc>> {
    parse_date_time(s).or_else(|| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .filter(within_storable_years)
    })
}
