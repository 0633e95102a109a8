pub mod models;
pub mod store;

pub use models::{Command, CommandFilter, MainCommand};
pub use store::Database;
