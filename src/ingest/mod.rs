pub mod coordinator;
pub mod record;
pub mod runner;
