//! oubli: persistent memory for conversational agents
//!
//! Main entry point for the oubli binary.
//!
//! Usage:
//!   oubli                      - Serve memory tools over MCP stdio (default)
//!   oubli call <tool> [json]   - Run a single tool call
//!   oubli tools                - List tool definitions
//!   oubli inject-context       - UserPromptSubmit hook output
//!   oubli session-start        - SessionStart hook output

mod hooks;
mod serve;

use oubli_core::{Config, CoreMemory, MemoryStore, ToolManager};
use oubli_tools::{register_memory_tools, shared_store};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// MCP server over stdin/stdout
    Serve,
    /// Run one tool and print its output
    Call { tool: String, input: String },
    /// Print tool definitions
    Tools,
    /// UserPromptSubmit hook
    InjectContext,
    /// SessionStart hook
    SessionStart,
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = match parse_args(&args) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run `oubli --help` for usage.");
            std::process::exit(2);
        }
    };

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("oubli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // .env may set RUST_LOG, so load it before building the filter
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries MCP traffic and hook output
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    let core = CoreMemory::new(&config.core_memory.path);
    tracing::debug!(
        db = %config.memory.db_path.display(),
        core_memory = %core.path().display(),
        "Loaded configuration"
    );

    match mode {
        RunMode::InjectContext => {
            println!("{}", hooks::inject_context(&core)?);
            Ok(())
        }
        RunMode::SessionStart => {
            println!("{}", hooks::session_start(&core)?);
            Ok(())
        }
        RunMode::Tools => {
            let manager = build_tool_manager(&config, core)?;
            println!("{}", serde_json::to_string_pretty(&manager.definitions())?);
            Ok(())
        }
        RunMode::Call { tool, input } => {
            let manager = build_tool_manager(&config, core)?;
            run_call(&manager, &tool, &input).await
        }
        RunMode::Serve => {
            let manager = build_tool_manager(&config, core)?;
            serve::run_serve(manager).await
        }
        RunMode::Help | RunMode::Version => Ok(()),
    }
}

/// Log filter from `RUST_LOG`, or `info` when unset or invalid
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> Result<RunMode, String> {
    let mut args = args.iter().map(String::as_str);

    let mode = match args.next() {
        None | Some("serve") => RunMode::Serve,
        Some("call") => {
            let tool = args
                .next()
                .ok_or_else(|| "call: missing tool name".to_string())?
                .to_string();
            let input = args.next().unwrap_or("{}").to_string();
            RunMode::Call { tool, input }
        }
        Some("tools") => RunMode::Tools,
        Some("inject-context") => RunMode::InjectContext,
        Some("session-start") => RunMode::SessionStart,
        Some("--help") | Some("-h") | Some("help") => RunMode::Help,
        Some("--version") | Some("-v") => RunMode::Version,
        Some(other) => return Err(format!("Unknown command: {}", other)),
    };

    if let Some(extra) = args.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }
    Ok(mode)
}

/// Open the memory store and register every tool
fn build_tool_manager(config: &Config, core: CoreMemory) -> anyhow::Result<ToolManager> {
    let store = MemoryStore::new(&config.memory.db_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to open memory store at {}: {}",
            config.memory.db_path.display(),
            e
        )
    })?;

    let mut manager = ToolManager::new();
    register_memory_tools(&mut manager, shared_store(store), core);

    tracing::debug!("Registered tools: {:?}", manager.tool_names());
    Ok(manager)
}

/// Run a single tool call and print its output
async fn run_call(manager: &ToolManager, tool: &str, input: &str) -> anyhow::Result<()> {
    let input: JsonValue = serde_json::from_str(input)
        .map_err(|e| anyhow::anyhow!("Invalid JSON input: {}", e))?;

    let result = manager.execute(tool, input).await?;
    println!("{}", result.output);

    if result.is_error {
        std::process::exit(1);
    }
    Ok(())
}

/// Print help message
fn print_help() {
    println!("oubli - persistent memory for conversational agents");
    println!();
    println!("Usage:");
    println!("  oubli                     Serve memory tools over MCP (stdio transport)");
    println!("  oubli call <tool> [json]  Run a single tool call");
    println!("  oubli tools               List tool definitions");
    println!("  oubli inject-context      Print UserPromptSubmit hook output");
    println!("  oubli session-start       Print core memory for the SessionStart hook");
    println!("  oubli --help              Show this help message");
    println!("  oubli --version           Show version");
    println!();
    println!("Environment Variables:");
    println!("  OUBLI_DATA_DIR            Data directory (default: ~/.oubli)");
    println!("  OUBLI_DB_PATH             Memory database (default: <data dir>/memories.db)");
    println!("  OUBLI_CORE_MEMORY_PATH    Core memory file (default: <data dir>/core_memory.md)");
    println!("  RUST_LOG                  Log filter (logs are written to stderr)");
}
