//! MCP server over stdio
//!
//! Exposes every tool registered in the [`ToolManager`] to the host agent
//! through the Model Context Protocol: `tools/list` returns the tool
//! definitions and `tools/call` runs the named tool.

use std::sync::Arc;

use oubli_core::ToolManager;
use rmcp::{
    ErrorData, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};
use serde_json::{Value as JsonValue, json};
use tracing::{debug, info, warn};

const INSTRUCTIONS: &str = "oubli keeps long-term memories about the user. Search memories \
     before answering questions about the user, save new facts with memory_save, and keep \
     the core memory document up to date with core_memory_save.";

/// MCP handler backed by the tool manager
#[derive(Clone)]
pub struct OubliServer {
    tools: Arc<ToolManager>,
}

impl OubliServer {
    pub fn new(tools: ToolManager) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }

    /// MCP tool descriptions for every registered tool
    fn mcp_tools(&self) -> Vec<Tool> {
        self.tools
            .definitions()
            .into_iter()
            .map(|def| {
                let schema = match def.input_schema {
                    JsonValue::Object(map) => map,
                    _ => JsonObject::new(),
                };
                Tool::new(def.name, def.description, Arc::new(schema))
            })
            .collect()
    }

    /// Run a tool call
    ///
    /// Unknown tools are a protocol error. Failures inside a tool are
    /// reported as an error result so the agent can read the message.
    async fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, ErrorData> {
        if !self.tools.contains(name) {
            warn!(tool = %name, "Call to unknown tool");
            return Err(ErrorData::invalid_params(format!("Unknown tool: {}", name), None));
        }

        let input = JsonValue::Object(arguments.unwrap_or_default());
        debug!(tool = %name, "Executing tool");

        match self.tools.execute(name, input).await {
            Ok(result) if result.is_error => Ok(CallToolResult::error(vec![Content::text(result.output)])),
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(result.output)])),
            Err(e) => {
                warn!(tool = %name, "Tool execution failed: {}", e);
                let body = json!({ "error": e.to_string() }).to_string();
                Ok(CallToolResult::error(vec![Content::text(body)]))
            }
        }
    }
}

impl ServerHandler for OubliServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "oubli".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.mcp_tools(),
            next_cursor: None,
            meta: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.call(&request.name, request.arguments).await }
    }
}

/// Serve the tools over stdin/stdout until the client disconnects
pub async fn run_serve(tools: ToolManager) -> anyhow::Result<()> {
    let server = OubliServer::new(tools);
    info!("Serving {} tools over MCP stdio", server.tools.len());

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    let reason = service.waiting().await?;

    info!("MCP session ended: {:?}", reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oubli_core::{CoreMemory, MemoryStore};
    use oubli_tools::{register_memory_tools, shared_store};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn server(dir: &tempfile::TempDir) -> OubliServer {
        let mut manager = ToolManager::new();
        register_memory_tools(
            &mut manager,
            shared_store(MemoryStore::in_memory().unwrap()),
            CoreMemory::new(dir.path().join("core_memory.md")),
        );
        OubliServer::new(manager)
    }

    fn text(result: &CallToolResult) -> JsonValue {
        let value = serde_json::to_value(result).unwrap();
        let text = value["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    fn arguments(value: JsonValue) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[test]
    fn test_mcp_tools_mirror_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        let tools = server.mcp_tools();
        assert_eq!(tools.len(), 10);

        let search = tools.iter().find(|t| t.name == "memory_search").unwrap();
        assert_eq!(search.input_schema.get("type"), Some(&json!("object")));
        assert_eq!(search.input_schema["required"], json!(["query"]));
    }

    #[tokio::test]
    async fn test_call_save_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        let saved = server
            .call(
                "memory_save",
                arguments(json!({"summary": "met Alice at the park", "keywords": ["Alice"]})),
            )
            .await
            .unwrap();
        assert_ne!(saved.is_error, Some(true));
        let saved = text(&saved);
        assert_eq!(saved["status"], "saved");

        let found = server
            .call("memory_search", arguments(json!({"query": "alice"})))
            .await
            .unwrap();
        assert_eq!(text(&found)[0]["id"], saved["id"]);
    }

    #[tokio::test]
    async fn test_call_errors() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        assert!(server.call("nope", None).await.is_err());

        let missing = server
            .call("memory_get", arguments(json!({"memory_id": "x"})))
            .await
            .unwrap();
        assert_eq!(missing.is_error, Some(true));
        assert_eq!(text(&missing), json!({"error": "Memory x not found"}));

        // Missing required argument
        let invalid = server.call("memory_get", None).await.unwrap();
        assert_eq!(invalid.is_error, Some(true));
        assert!(text(&invalid)["error"].as_str().unwrap().contains("memory_id"));
    }

    async fn send(writer: &mut tokio::io::WriteHalf<tokio::io::DuplexStream>, message: JsonValue) {
        let mut line = message.to_string();
        line.push('\n');
        writer.write_all(line.as_bytes()).await.unwrap();
        writer.flush().await.unwrap();
    }

    async fn receive(
        lines: &mut tokio::io::Lines<BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>>,
    ) -> JsonValue {
        let line = lines.next_line().await.unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn test_json_rpc_session() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let handle = tokio::spawn(async move {
            let service = rmcp::serve_server(server, server_io).await?;
            service.waiting().await?;
            anyhow::Ok(())
        });

        let (read, mut write) = tokio::io::split(client_io);
        let mut lines = BufReader::new(read).lines();

        send(
            &mut write,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "oubli-test", "version": "0.0.0"}
                }
            }),
        )
        .await;
        let init = receive(&mut lines).await;
        assert_eq!(init["id"], 1);
        assert_eq!(init["result"]["serverInfo"]["name"], "oubli");
        assert!(init["result"]["capabilities"]["tools"].is_object());

        send(
            &mut write,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await;

        send(
            &mut write,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {}}),
        )
        .await;
        let listed = receive(&mut lines).await;
        assert_eq!(listed["id"], 2);
        assert_eq!(listed["result"]["tools"].as_array().unwrap().len(), 10);

        send(
            &mut write,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "memory_stats", "arguments": {}}
            }),
        )
        .await;
        let called = receive(&mut lines).await;
        assert_eq!(called["id"], 3);
        let stats: JsonValue =
            serde_json::from_str(called["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(stats["total"], 0);

        drop(write);
        drop(lines);
        handle.await.unwrap().unwrap();
    }
}
