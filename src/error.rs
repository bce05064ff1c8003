use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneralizeError {
    #[error("feature #{feature} has invalid geometry: {reason}")]
    InvalidGeometry { feature: usize, reason: String },

    #[error("feature #{feature} length error too large: {error:.8} > {tolerance:.8}")]
    LengthMismatch {
        feature: usize,
        error: f64,
        tolerance: f64,
    },
}

pub type Result<T> = std::result::Result<T, GeneralizeError>;
