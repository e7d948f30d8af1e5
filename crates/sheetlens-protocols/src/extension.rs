//! Extension contract: a bundle of tools installed into a registry.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ExtensionError;
use crate::tool::Tool;
use crate::types::Version;

/// A pluggable set of tools with a lifecycle.
#[async_trait]
pub trait Extension: Send + Sync + 'static {
    fn manifest(&self) -> &ExtensionManifest;

    /// Register tools into `ctx.tool_registry`.
    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError>;

    async fn shutdown(&self) -> Result<(), ExtensionError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Registry handle given to extensions.
pub trait ToolRegistryAccess: Send + Sync {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError>;

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError>;
}

/// Handed to [`Extension::initialize`].
#[derive(Clone)]
pub struct ExtensionContext {
    /// Extension-specific configuration.
    pub config: serde_json::Value,

    pub tool_registry: Arc<dyn ToolRegistryAccess>,
}

impl ExtensionContext {
    pub fn new(config: serde_json::Value, tool_registry: Arc<dyn ToolRegistryAccess>) -> Self {
        Self {
            config,
            tool_registry,
        }
    }

    /// Typed lookup of one configuration key. Missing or mistyped keys yield `None`.
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    pub id: String,
    pub name: String,
    pub version: Version,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provides: Provides,
}

impl ExtensionManifest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            description: String::new(),
            provides: Provides::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What an extension contributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provides {
    #[serde(default)]
    pub tools: Vec<String>,
}
