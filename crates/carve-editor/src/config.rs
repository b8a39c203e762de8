//! Editor configuration

use serde::{Deserialize, Serialize};

/// Editor configuration
///
/// Every field has a default, so partial configuration files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backspace attempts per keystroke before giving up
    pub max_backspace_retries: usize,
    /// Number of undo snapshots kept
    pub history_size: usize,
    /// Visible text length under which an annotated region is flagged for removal
    pub rdfa_almost_complete_threshold: usize,
    /// Headless layout metrics
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_backspace_retries: 50,
            history_size: 100,
            rdfa_almost_complete_threshold: 5,
            layout: LayoutConfig::default(),
        }
    }
}

/// Metrics for the headless layout model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_backspace_retries, 50);
        assert_eq!(config.history_size, 100);
        assert_eq!(config.rdfa_almost_complete_threshold, 5);
    }

    #[test]
    fn test_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{ "max_backspace_retries": 3, "layout": { "line_height": 20.0 } }"#)
                .unwrap();
        assert_eq!(config.max_backspace_retries, 3);
        assert_eq!(config.history_size, 100);
        assert_eq!(config.layout.line_height, 20.0);
        assert_eq!(config.layout.char_width, 8.0);
    }
}
