//! Command implementations for combat-replay
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod run;
mod validate;

pub use run::Run;
pub use validate::Validate;
