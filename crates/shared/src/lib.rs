pub mod domain;
pub mod error;
pub mod schema;
pub mod state;
