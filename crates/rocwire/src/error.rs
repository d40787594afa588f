use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    #[error("truncated buffer: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("value does not match data type {expected}")]
    TypeMismatch { expected: &'static str },
}

pub type Result<T> = std::result::Result<T, WireError>;
