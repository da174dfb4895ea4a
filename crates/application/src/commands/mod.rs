pub mod builtin;
mod context;
mod registry;

pub use context::{CommandContext, ReloadPort};
pub use registry::{Command, CommandRegistry};
