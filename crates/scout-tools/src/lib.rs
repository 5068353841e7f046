//! Tool contract for signal-scout
//!
//! Scanners are exposed as tools: a name, a description, a JSON schema for
//! the input and an async `execute` that returns JSON. Any agent framework
//! can drive them through [`ToolRegistry::invoke`] without the scanners
//! knowing anything about that framework's dispatch.

pub mod error;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tool::Tool;
