use serde::{Deserialize, Serialize};

use crate::error::{GraphicError, GraphicResult};

pub const DEFAULT_GRAPHICS_KEY: &str = "graphic";
pub const DEFAULT_ROOT_ID: &str = "__graphic_root__";

/// Reconciler configuration for one chart.
///
/// Serializable so hosts can keep it next to the rest of their chart setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicConfig {
    /// Option key the scene is installed under.
    #[serde(default = "default_graphics_key")]
    pub graphics_key: String,
    /// Id of the synthetic root group.
    #[serde(default = "default_root_id")]
    pub root_id: String,
    /// Start with chart updates suspended.
    #[serde(default)]
    pub manual_update: bool,
}

impl Default for GraphicConfig {
    fn default() -> Self {
        Self {
            graphics_key: default_graphics_key(),
            root_id: default_root_id(),
            manual_update: false,
        }
    }
}

impl GraphicConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_graphics_key(mut self, key: impl Into<String>) -> Self {
        self.graphics_key = key.into();
        self
    }

    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    #[must_use]
    pub fn with_manual_update(mut self, manual_update: bool) -> Self {
        self.manual_update = manual_update;
        self
    }

    pub fn validate(self) -> GraphicResult<Self> {
        for (value, name) in [
            (&self.graphics_key, "graphics_key"),
            (&self.root_id, "root_id"),
        ] {
            if value.trim().is_empty() {
                return Err(GraphicError::InvalidConfig(format!(
                    "`{name}` must not be empty"
                )));
            }
        }
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> GraphicResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            GraphicError::InvalidConfig(format!("failed to parse graphic config: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> GraphicResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn default_graphics_key() -> String {
    DEFAULT_GRAPHICS_KEY.to_owned()
}

fn default_root_id() -> String {
    DEFAULT_ROOT_ID.to_owned()
}
