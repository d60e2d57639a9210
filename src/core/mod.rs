mod coerce;
mod engine;
mod types;

pub use coerce::{Coerced, CoercionSource, coerce_text, coerce_value, finite_or, to_number};
pub use engine::{calculate, calculate_with};
pub use types::{
    CoercedInput, DEFAULT_HORIZON_MONTHS, FieldDiagnostic, ProjectionConfig, ProjectionPoint,
    RawRoiInput, RoiInput, RoiResult,
};
