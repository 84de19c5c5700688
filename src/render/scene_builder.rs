use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::{CORRELATION_ID_KEY, GraphicNode};
use crate::interaction::{event_field_name, normalize_handlers};

use super::element_schema::{FieldBucket, route_prop};
use super::scene::{SceneElement, SceneTree};

const INFO_PROP: &str = "info";
const SHAPE_PROP: &str = "shape";
const STYLE_PROP: &str = "style";
/// Key under which a non-object user `info` is kept next to the correlation id.
pub const INFO_VALUE_KEY: &str = "value";

/// Builds the nested scene for the active nodes.
///
/// Siblings are ordered by `order`; ties keep the order of `nodes`. Only group
/// nodes receive children. Nodes whose parent is not active are left out
/// together with their subtree; a parent id equal to `root_id` counts as
/// root level.
#[must_use]
pub fn build(nodes: &[GraphicNode], root_id: &str) -> SceneTree {
    let mut by_parent: HashMap<Option<&str>, Vec<&GraphicNode>> = HashMap::new();
    for node in nodes {
        let parent = node
            .parent_id
            .as_deref()
            .filter(|parent| *parent != root_id);
        by_parent.entry(parent).or_default().push(node);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|node| node.order);
    }

    let children = materialize_children(None, &by_parent);
    let materialized = count_elements(&children);
    if materialized < nodes.len() {
        debug!(
            total = nodes.len(),
            materialized,
            "omitting graphic nodes without an active parent"
        );
    }

    SceneTree {
        root_id: root_id.to_owned(),
        children,
    }
}

fn materialize_children(
    parent: Option<&str>,
    by_parent: &HashMap<Option<&str>, Vec<&GraphicNode>>,
) -> Vec<SceneElement> {
    by_parent
        .get(&parent)
        .map(|siblings| {
            siblings
                .iter()
                .map(|node| build_element(node, by_parent))
                .collect()
        })
        .unwrap_or_default()
}

fn build_element(
    node: &GraphicNode,
    by_parent: &HashMap<Option<&str>, Vec<&GraphicNode>>,
) -> SceneElement {
    let mut element = SceneElement::new(node.kind, node.id.clone());
    let mut shape = Map::new();
    let mut style = Map::new();
    let mut explicit_shape = None;
    let mut explicit_style = None;

    for (name, value) in &node.props {
        match name.as_str() {
            INFO_PROP => continue,
            SHAPE_PROP if value.is_object() => {
                explicit_shape = value.as_object();
                continue;
            }
            STYLE_PROP if value.is_object() => {
                explicit_style = value.as_object();
                continue;
            }
            _ => {}
        }
        match route_prop(node.kind, name) {
            Some(FieldBucket::Common) => {
                element.common.insert(name.clone(), value.clone());
            }
            Some(FieldBucket::Shape) => {
                shape.insert(name.clone(), value.clone());
            }
            Some(FieldBucket::Style) => {
                style.insert(name.clone(), value.clone());
            }
            None => {
                debug!(id = %node.id, kind = %node.kind, prop = %name, "dropping unsupported graphic prop");
            }
        }
    }

    element.shape = merge_bucket(explicit_shape, shape);
    element.style = merge_bucket(explicit_style, style);
    element.info = build_info(node);

    for (event, handler) in normalize_handlers(&node.handlers) {
        element.handlers.insert(event_field_name(&event), handler);
    }

    if node.kind.is_group() {
        element.children = materialize_children(Some(node.id.as_str()), by_parent);
    }
    element
}

/// Explicit `shape`/`style` objects form the base; individual props override.
fn merge_bucket(
    explicit: Option<&Map<String, Value>>,
    routed: Map<String, Value>,
) -> Option<Map<String, Value>> {
    let mut merged = explicit.cloned().unwrap_or_default();
    merged.extend(routed);
    (!merged.is_empty()).then_some(merged)
}

/// User `info` folded with the correlation id.
///
/// Purely decorative nodes (no info, no handlers) carry no `info` at all.
fn build_info(node: &GraphicNode) -> Option<Value> {
    let user_info = node.props.get(INFO_PROP).filter(|value| !value.is_null());
    if user_info.is_none() && !node.has_handlers() {
        return None;
    }

    let mut info = match user_info {
        Some(Value::Object(fields)) => fields.clone(),
        Some(other) => {
            let mut fields = Map::new();
            fields.insert(INFO_VALUE_KEY.to_owned(), other.clone());
            fields
        }
        None => Map::new(),
    };
    info.insert(
        CORRELATION_ID_KEY.to_owned(),
        Value::String(node.id.clone()),
    );
    Some(Value::Object(info))
}

fn count_elements(elements: &[SceneElement]) -> usize {
    elements
        .iter()
        .map(|element| 1 + count_elements(&element.children))
        .sum()
}
