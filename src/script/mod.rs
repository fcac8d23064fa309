//! Action scripts
//!
//! Overworld entities don't move the player or open text boxes themselves.
//! They emit a small line-based script (`version=2`, `@ns.cmd(args)`, `:end`)
//! and hand it to a `ScriptHost`, which owns the interpreter.

pub mod action;
pub mod host;

pub use action::{ActionScript, Command, SCRIPT_VERSION};
pub use host::{HostCall, ScriptHost, ScriptLog};
