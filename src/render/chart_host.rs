use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::EventHandler;
use crate::error::GraphicResult;

use super::scene::SceneTree;

/// Chart-level listener bound per event name.
pub type ChartListener = EventHandler;

/// Merge strategy attached to one option update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub not_merge: bool,
    /// Option keys whose components are replaced instead of merged.
    #[serde(default)]
    pub replace_merge: Vec<String>,
    #[serde(default)]
    pub lazy_update: bool,
    #[serde(default)]
    pub silent: bool,
}

impl UpdateRequest {
    /// Adds `key` to the replace-merge scope, keeping every other decision.
    #[must_use]
    pub fn with_replace_merge(mut self, key: &str) -> Self {
        if !self.replace_merge.iter().any(|existing| existing == key) {
            self.replace_merge.push(key.to_owned());
        }
        self
    }
}

/// Scene installed under a configuration key of a `ChartOption`.
#[derive(Debug, Clone)]
pub struct GraphicSlot {
    pub key: String,
    pub tree: SceneTree,
}

/// Chart configuration object.
///
/// `fields` is the caller's configuration; `graphic` is the reconciler-owned
/// scene, kept typed so element callbacks survive the trip to the host.
#[derive(Debug, Clone, Default)]
pub struct ChartOption {
    pub fields: Map<String, Value>,
    pub graphic: Option<GraphicSlot>,
}

impl ChartOption {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON object. Non-object values produce an empty option.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self {
                fields,
                graphic: None,
            },
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.graphic.as_ref().is_some_and(|slot| slot.key == key)
    }

    #[must_use]
    pub fn scene(&self) -> Option<&SceneTree> {
        self.graphic.as_ref().map(|slot| &slot.tree)
    }

    pub fn to_value(&self) -> GraphicResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for ChartOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.fields {
            if self.graphic.as_ref().is_some_and(|slot| &slot.key == key) {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        if let Some(slot) = &self.graphic {
            map.serialize_entry(&slot.key, &slot.tree)?;
        }
        map.end()
    }
}

/// Contract implemented by the imperative chart instance.
///
/// The reconciler pushes whole options with an explicit merge strategy and
/// keeps at most one listener bound per event name.
pub trait ChartHost {
    fn set_option(&mut self, option: &ChartOption, request: &UpdateRequest) -> GraphicResult<()>;

    /// Binds `listener` for `event`, replacing any listener the reconciler bound before.
    fn on(&mut self, event: &str, listener: ChartListener);

    fn off(&mut self, event: &str);
}
