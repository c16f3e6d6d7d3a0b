use std::fmt::{self, Display};

/// Errors produced while parsing model values from their textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownOperator(String),
    UnknownDirection(String),
    UnknownTimeUnit(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownOperator(raw) => {
                write!(f, "unknown filter operator: {raw}")
            }
            ModelError::UnknownDirection(raw) => {
                write!(f, "unknown sort direction: {raw}")
            }
            ModelError::UnknownTimeUnit(raw) => {
                write!(f, "unknown time unit: {raw}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
