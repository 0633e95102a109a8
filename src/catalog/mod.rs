//! The command catalog: which commands exist and what parameters they take.

pub mod validator;

pub use validator::{validate, validate_definition};
