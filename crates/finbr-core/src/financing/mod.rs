pub mod amortization;
pub mod cashflow;
pub mod cet;
pub mod irr;
