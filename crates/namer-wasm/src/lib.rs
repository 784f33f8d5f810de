//! WASM bridge for Layer Namer: renames a host snapshot for the JS plugin shell.
//!
//! The shell serializes the current page and selection, calls
//! [`rename_snapshot`], applies the returned renames to its live nodes by id,
//! shows `message` and closes the plugin.

use namer_core::id::NodeId;
use namer_core::rename::RenameEntry;
use namer_core::session::{PluginConfig, RunOutcome, rename_selection_with_report};
use namer_core::snapshot;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// What the shell receives back from one run.
#[derive(Debug, Serialize)]
struct RenameResponse {
    #[serde(flatten)]
    outcome: RunOutcome,
    message: String,
    renames: Vec<RenameEntry<NodeId>>,
}

/// Rename the selection of a JSON snapshot.
///
/// `config_json` may be empty for the defaults, or a partial
/// `{"rename": {...}, "messages": {...}}` object. Returns
/// `{"outcome":"renamed","count":N,"message":"...","renames":[{"node":"1:2","from":"...","to":"..."}]}`
/// or `{"outcome":"nothing_selected",...}`.
#[wasm_bindgen]
pub fn rename_snapshot(snapshot_json: &str, config_json: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook_setup();
    let json = rename_snapshot_json(snapshot_json, config_json).map_err(|e| JsValue::from_str(&e))?;
    js_sys::JSON::parse(&json)
}

/// The default configuration as pretty JSON, for the shell's settings view.
#[wasm_bindgen]
pub fn default_config() -> String {
    serde_json::to_string_pretty(&PluginConfig::default()).unwrap_or_else(|_| "{}".to_string())
}

fn parse_config(config_json: &str) -> Result<PluginConfig, String> {
    if config_json.trim().is_empty() {
        return Ok(PluginConfig::default());
    }
    serde_json::from_str(config_json).map_err(|e| format!("Config error: {e}"))
}

fn rename_snapshot_json(snapshot_json: &str, config_json: &str) -> Result<String, String> {
    let config = parse_config(config_json)?;
    let mut doc = snapshot::from_json(snapshot_json)?;

    let roots = doc.selection.clone();
    let (outcome, report) = rename_selection_with_report(&mut doc, &roots, &config.rename);
    log::debug!("wasm: {outcome:?}, {} write(s)", report.len());

    let response = RenameResponse {
        outcome,
        message: outcome.message(&config.messages),
        renames: report
            .into_iter()
            .map(|entry| RenameEntry {
                node: doc.layer(entry.node).id,
                from: entry.from,
                to: entry.to,
            })
            .collect(),
    };
    serde_json::to_string(&response).map_err(|e| format!("Serialization error: {e}"))
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Layer Namer WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
