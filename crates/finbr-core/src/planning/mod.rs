pub mod compound;
pub mod fire;
pub mod retirement;
