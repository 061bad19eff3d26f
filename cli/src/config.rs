//! TOML page configurations.
//!
//! The file deserializes into the same serde model the browser reads as JSON, so both front ends
//! accept exactly the same fields and defaults.

use std::path::Path;

use anyhow::Context;
use page_hooks_protocol::PageBindingsConfig;

pub fn load_page_config(path: &Path) -> anyhow::Result<PageBindingsConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_page_config(&content).with_context(|| format!("load {}", path.display()))
}

pub fn parse_page_config(content: &str) -> anyhow::Result<PageBindingsConfig> {
    let config: PageBindingsConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
