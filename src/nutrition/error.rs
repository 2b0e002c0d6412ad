use thiserror::Error;

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("nutrition request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("nutrition service returned HTTP {status} for product {code}")]
    Status { code: String, status: u16 },

    #[error("product code is empty")]
    EmptyCode,

    #[error("invalid nutrition client configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("nutrition lookup failed: {0}")]
    Other(String),
}

pub type NutritionResult<T> = Result<T, NutritionError>;
