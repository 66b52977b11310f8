use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{is_valid_email, require, ValidationError};

pub const NAME_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

/// The mutable part of a customer, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFields {
    pub name: String,
    pub email: Option<String>,
}

/// Request body for creating or replacing a customer. Any `id` sent by the
/// client is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CustomerInput {
    pub fn validate(self) -> Result<CustomerFields, ValidationError> {
        let name = require(self.name, "name")?;
        if name.trim().is_empty() {
            return Err(ValidationError::Blank("name"));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: "name",
                max: NAME_MAX_CHARS,
            });
        }

        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(CustomerFields {
            name,
            email: self.email,
        })
    }
}

impl Customer {
    pub fn new(fields: CustomerFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
        }
    }
}
