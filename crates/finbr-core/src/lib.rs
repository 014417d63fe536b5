pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "payroll")]
pub mod payroll;

#[cfg(feature = "planning")]
pub mod planning;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "budgeting")]
pub mod budgeting;

pub use error::FinbrError;
pub use types::*;

/// Standard result type for all finbr operations
pub type FinbrResult<T> = Result<T, FinbrError>;
