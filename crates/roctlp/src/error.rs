use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TlpError {
    #[error("no point type defined for number {0}")]
    PointTypeNotFound(u8),

    #[error("no point type defined for name {0}")]
    PointTypeNameNotFound(String),

    #[error("point type {point_type} has no parameter {parameter}")]
    ParameterNotFound { point_type: u8, parameter: u8 },

    #[error("point type {point_type} has no parameter named {name}")]
    ParameterNameNotFound { point_type: u8, name: String },
}

pub type Result<T> = std::result::Result<T, TlpError>;
