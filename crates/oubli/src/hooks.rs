//! Session hook output
//!
//! The host agent runs these commands from its hooks to load core memory
//! into the conversation context.

use oubli_core::CoreMemory;
use serde_json::json;

/// JSON for the `UserPromptSubmit` hook, injected on every prompt
pub fn inject_context(core: &CoreMemory) -> anyhow::Result<String> {
    let mut additional_context = String::new();

    if core.exists() {
        let content = core.load()?;
        if !content.is_empty() {
            additional_context = format!("# Core Memory\n\n{}", content);
        }
    }

    let output = json!({
        "hookSpecificOutput": {
            "hookEventName": "UserPromptSubmit",
            "additionalContext": additional_context
        }
    });
    Ok(output.to_string())
}

/// Plain-text core memory for the `SessionStart` hook
pub fn session_start(core: &CoreMemory) -> anyhow::Result<String> {
    if !core.exists() {
        return Ok("No core memory found. Use core_memory_save to create one.".to_string());
    }

    let content = core.load()?;
    if content.is_empty() {
        Ok("Core memory file exists but is empty.".to_string())
    } else {
        Ok(format!("# Core Memory (loaded automatically)\n\n{}", content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn additional_context(output: &str) -> String {
        let value: Value = serde_json::from_str(output).unwrap();
        assert_eq!(value["hookSpecificOutput"]["hookEventName"], "UserPromptSubmit");
        value["hookSpecificOutput"]["additionalContext"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_inject_context() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreMemory::new(dir.path().join("core_memory.md"));

        assert_eq!(additional_context(&inject_context(&core).unwrap()), "");

        core.save("").unwrap();
        assert_eq!(additional_context(&inject_context(&core).unwrap()), "");

        core.save("Name: Sam").unwrap();
        assert_eq!(
            additional_context(&inject_context(&core).unwrap()),
            "# Core Memory\n\nName: Sam"
        );
    }

    #[test]
    fn test_session_start() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreMemory::new(dir.path().join("core_memory.md"));

        assert!(session_start(&core).unwrap().starts_with("No core memory found"));

        core.save("").unwrap();
        assert_eq!(session_start(&core).unwrap(), "Core memory file exists but is empty.");

        core.save("Name: Sam").unwrap();
        assert_eq!(
            session_start(&core).unwrap(),
            "# Core Memory (loaded automatically)\n\nName: Sam"
        );
    }
}
