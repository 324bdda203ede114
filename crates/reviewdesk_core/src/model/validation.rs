//! Boundary validation errors shared by typed inputs.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reason for malformed input reaching the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    BlankField(&'static str),
    /// Username is shorter than the accepted minimum.
    UsernameTooShort { min: usize, actual: usize },
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Expertise list contains an empty tag.
    BlankExpertiseTag,
    /// Review sub-score outside `0..=max`.
    ScoreOutOfRange {
        criterion: &'static str,
        value: i32,
        max: i32,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::UsernameTooShort { min, actual } => write!(
                f,
                "username must have at least {min} characters, got {actual}"
            ),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::BlankExpertiseTag => write!(f, "expertise tags must not be blank"),
            Self::ScoreOutOfRange {
                criterion,
                value,
                max,
            } => write!(f, "{criterion} score {value} is outside 0..={max}"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
