pub mod error;
pub mod types;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "housing")]
pub mod housing;

#[cfg(feature = "student_loans")]
pub mod student_loans;

#[cfg(feature = "fitness")]
pub mod fitness;

#[cfg(feature = "chemistry")]
pub mod chemistry;

#[cfg(feature = "numerology")]
pub mod numerology;

#[cfg(feature = "personal_finance")]
pub mod personal_finance;

#[cfg(feature = "forms")]
pub mod forms;

pub use error::CalcError;
pub use types::*;

/// Standard result type for all calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
