use crate::application::config::BridgeConfig;
use crate::error;

/// Parses the options JSON handed over by the managed side at setup.
/// A blank string stands for "no options" and yields the defaults.
pub fn format_options_json(json_str: &str) -> Result<BridgeConfig, error::Error> {
    if json_str.trim().is_empty() {
        return Ok(BridgeConfig::default());
    }
    serde_json::from_str::<BridgeConfig>(json_str).map_err(|e| error::Error::SerdeError { error: e })
}
