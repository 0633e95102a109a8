//! Status lifecycle of dispatched commands.

pub mod status;
mod transition;

pub use status::CommandStatus;
