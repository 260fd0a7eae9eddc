use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-strategy switches, usually read from host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyOptions {
    /// Place connectors on the owner's bounding rectangle instead of its true outline.
    pub bounds_mode: bool,
    /// Which side wins when a point sits on a corner: left/right (`true`) or top/bottom.
    pub prefer_left_right: bool,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            bounds_mode: true,
            prefer_left_right: true,
        }
    }
}

impl StrategyOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn free_boundary() -> Self {
        Self {
            bounds_mode: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let opts = StrategyOptions::from_json(r#"{ "boundsMode": false }"#).unwrap();
        assert!(!opts.bounds_mode);
        assert!(opts.prefer_left_right);
        assert_eq!(StrategyOptions::from_json("{}").unwrap(), StrategyOptions::default());
        assert!(StrategyOptions::from_json("[1]").is_err());
    }
}
