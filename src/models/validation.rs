use once_cell::sync::Lazy;
use regex::Regex;

/// Email syntax accepted by HTML5 `type=email` inputs.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Input rejected before it reaches storage. Every variant names the field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Blank(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("'{0}' is not a valid id for {1}")]
    InvalidId(String, &'static str),

    #[error("'{0}' is not a valid timestamp for {1}")]
    InvalidTimestamp(String, &'static str),

    #[error("invalid status '{0}': expected one of scheduled, done, cancelled")]
    InvalidStatus(String),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing(field) | ValidationError::Blank(field) => field,
            ValidationError::TooLong { field, .. } => field,
            ValidationError::InvalidEmail(_) => "email",
            ValidationError::InvalidId(_, field) => field,
            ValidationError::InvalidTimestamp(_, field) => field,
            ValidationError::InvalidStatus(_) => "status",
        }
    }
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing(field))
}
