//! Page snippet rendering.

use anyhow::Context;
use page_hooks_protocol::PageBindingsConfig;
use page_hooks_protocol::config::CONFIG_ELEMENT_ID;

/// Serialized config, safe to place inside a `<script>` element: `</` can never close the tag
/// and `<!--` can never open a comment.
pub fn config_json(config: &PageBindingsConfig) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(config).context("serialize page configuration")?;
    Ok(json.replace("</", "<\\/").replace("<!--", "<\\u0021--"))
}

pub fn script_element(config: &PageBindingsConfig) -> anyhow::Result<String> {
    let json = config_json(config)?;
    Ok(format!(
        "<script type=\"application/json\" id=\"{CONFIG_ELEMENT_ID}\">\n{json}\n</script>\n"
    ))
}
