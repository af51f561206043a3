pub mod aggregate;
pub mod century;
pub mod report;
