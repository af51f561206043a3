pub mod lookup;
pub mod repo;
pub mod schema;
