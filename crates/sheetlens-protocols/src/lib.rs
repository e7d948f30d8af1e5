//! # Sheetlens Protocols
//!
//! Contracts between the spreadsheet tools and whatever hosts them.
//! Interfaces and plain data only; no implementations live here.
//!
//! - [`Tool`] - an invocable unit with a JSON parameter object
//! - [`Extension`] - a bundle of tools registered at startup
//! - [`ToolRegistryAccess`] - how extensions hand their tools to the host

pub mod error;
pub mod extension;
pub mod tool;
pub mod types;

pub use error::{ExtensionError, ToolError};
pub use extension::{Extension, ExtensionContext, ExtensionManifest, Provides, ToolRegistryAccess};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::{Metadata, RiskLevel, Version};
