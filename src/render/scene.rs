use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::core::{ChartEvent, ElementKind, EventHandler};
use crate::error::GraphicResult;

/// Merge action requested on the synthetic root group.
pub const ROOT_ACTION: &str = "replace";

/// One element of the nested scene handed to the chart host.
///
/// `handlers` holds the `on<event>` callbacks. They travel with the typed
/// element but are not part of its JSON form.
#[derive(Clone)]
pub struct SceneElement {
    pub kind: ElementKind,
    pub id: String,
    pub common: Map<String, Value>,
    pub handlers: IndexMap<String, EventHandler>,
    pub info: Option<Value>,
    pub shape: Option<Map<String, Value>>,
    pub style: Option<Map<String, Value>>,
    pub children: Vec<SceneElement>,
}

impl SceneElement {
    #[must_use]
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            common: Map::new(),
            handlers: IndexMap::new(),
            info: None,
            shape: None,
            style: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn handler(&self, field: &str) -> Option<&EventHandler> {
        self.handlers.get(field)
    }

    /// Field names of the attached handlers, e.g. `onclick`.
    pub fn handler_fields(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Depth-first lookup among this element and its descendants.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SceneElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn to_json(&self) -> GraphicResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Debug for SceneElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneElement")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("common", &self.common)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("info", &self.info)
            .field("shape", &self.shape)
            .field("style", &self.style)
            .field("children", &self.children)
            .finish()
    }
}

impl Serialize for SceneElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.as_str())?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in &self.common {
            map.serialize_entry(name, value)?;
        }
        if let Some(info) = &self.info {
            map.serialize_entry("info", info)?;
        }
        if let Some(shape) = &self.shape {
            map.serialize_entry("shape", shape)?;
        }
        if let Some(style) = &self.style {
            map.serialize_entry("style", style)?;
        }
        if !self.children.is_empty() {
            map.serialize_entry("children", &self.children)?;
        }
        map.end()
    }
}

/// Complete overlay scene under one synthetic root group.
///
/// Serializes to the value placed under the graphics option key:
/// `{"elements": [{"type": "group", "id": <root>, "$action": "replace", "children": [...]}]}`.
/// The root always lists its children, even when empty, so that removals reach
/// the chart.
#[derive(Debug, Clone)]
pub struct SceneTree {
    pub root_id: String,
    pub children: Vec<SceneElement>,
}

impl SceneTree {
    #[must_use]
    pub fn empty(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SceneElement> {
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Ids of the root-level elements in render order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.id.as_str()).collect()
    }

    /// Invokes the element-level `on<event>` callback of element `id`.
    ///
    /// Returns `false` when the element or the callback does not exist.
    pub fn fire_element_handler(&self, id: &str, event: &ChartEvent) -> bool {
        let field = crate::interaction::event_field_name(&event.name);
        let Some(handler) = self.find(id).and_then(|element| element.handler(&field)) else {
            return false;
        };
        handler(event);
        true
    }

    pub fn to_json(&self) -> GraphicResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

struct RootGroup<'a>(&'a SceneTree);

impl Serialize for RootGroup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("type", ElementKind::Group.as_str())?;
        map.serialize_entry("id", &self.0.root_id)?;
        map.serialize_entry("$action", ROOT_ACTION)?;
        map.serialize_entry("children", &self.0.children)?;
        map.end()
    }
}

impl Serialize for SceneTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("elements", &[RootGroup(self)])?;
        map.end()
    }
}
