pub mod budgeting;
pub mod financing;
pub mod payroll;
pub mod planning;
pub mod rates;
pub mod valuation;
