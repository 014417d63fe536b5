pub mod inss;
pub mod irrf;
pub mod net_salary;
pub mod tables;
pub mod thirteenth;
