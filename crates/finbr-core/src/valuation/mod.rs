pub mod capm;
pub mod gordon;
