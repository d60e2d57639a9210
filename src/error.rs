use thiserror::Error;

use crate::core::{CoercedInput, RoiInput};

pub const MAX_HORIZON_MONTHS: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("history capacity must be > 0")]
    ZeroHistoryCapacity,
    #[error("horizon must be between 1 and {max} months, got {0}", max = MAX_HORIZON_MONTHS)]
    HorizonOutOfRange(u32),
    #[error("volume growth must be a finite percent >= -100, got {0}")]
    InvalidVolumeGrowth(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("non-numeric or missing values for: {}", .fields.join(", "))]
pub struct StrictInputError {
    pub fields: Vec<&'static str>,
}

pub fn require_strict(coerced: CoercedInput) -> Result<RoiInput, StrictInputError> {
    let fields = coerced.rejected_fields();
    if fields.is_empty() {
        Ok(coerced.input)
    } else {
        Err(StrictInputError { fields })
    }
}
