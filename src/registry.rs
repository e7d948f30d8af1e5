//! In-process tool registry.

use std::sync::Arc;

use dashmap::DashMap;

use sheetlens_protocols::error::{ExtensionError, ToolError};
use sheetlens_protocols::extension::ToolRegistryAccess;
use sheetlens_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

/// Tools keyed by definition id.
#[derive(Default)]
pub(crate) struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).map(|tool| tool.clone())
    }

    /// Definitions sorted by id.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .iter()
            .map(|entry| entry.value().definition().clone())
            .collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    /// Look up `id`, validate `params` against it, then run it.
    pub async fn execute(
        &self,
        id: &str,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(id)
            .ok_or_else(|| ToolError::NotFound(id.to_string()))?;
        tool.validate(&params)?;
        tool.execute(params, ctx).await
    }
}

impl ToolRegistryAccess for ToolRegistry {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        let id = tool.definition().id.clone();
        if self.tools.contains_key(&id) {
            return Err(ExtensionError::AlreadyRegistered(id));
        }
        self.tools.insert(id, tool);
        Ok(())
    }

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError> {
        self.tools
            .remove(tool_id)
            .ok_or_else(|| ExtensionError::NotFound(tool_id.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new(id: &str) -> Self {
            Self {
                definition: ToolDefinition::new(id, "Mock", "A mock tool"),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success("executed"))
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register_tool(Arc::new(MockTool::new("b"))).unwrap();
        registry.register_tool(Arc::new(MockTool::new("a"))).unwrap();

        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
        let ids: Vec<String> = registry.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_execute_validates_first() {
        let registry = ToolRegistry::new();
        registry.register_tool(Arc::new(MockTool::new("a"))).unwrap();

        let result = registry
            .execute("a", serde_json::json!({}), ToolContext::new("test"))
            .await
            .unwrap();
        assert_eq!(result.content, "executed");

        let err = registry
            .execute("a", serde_json::json!([1]), ToolContext::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("nope", serde_json::json!({}), ToolContext::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn test_register_duplicate() {
        let registry = ToolRegistry::new();
        registry.register_tool(Arc::new(MockTool::new("a"))).unwrap();
        let err = registry.register_tool(Arc::new(MockTool::new("a"))).unwrap_err();
        assert!(matches!(err, ExtensionError::AlreadyRegistered(id) if id == "a"));
    }

    #[test]
    fn test_unregister() {
        let registry = ToolRegistry::new();
        registry.register_tool(Arc::new(MockTool::new("a"))).unwrap();
        registry.unregister_tool("a").unwrap();
        assert!(registry.get("a").is_none());
        assert!(matches!(
            registry.unregister_tool("a"),
            Err(ExtensionError::NotFound(_))
        ));
    }
}
