use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::HandlerValue;

/// Closed set of overlay element kinds understood by the chart host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Group,
    Image,
    Text,
    Rect,
    Circle,
    Ring,
    Sector,
    Arc,
    Polygon,
    Polyline,
    Line,
    BezierCurve,
}

impl ElementKind {
    pub const ALL: [ElementKind; 12] = [
        Self::Group,
        Self::Image,
        Self::Text,
        Self::Rect,
        Self::Circle,
        Self::Ring,
        Self::Sector,
        Self::Arc,
        Self::Polygon,
        Self::Polyline,
        Self::Line,
        Self::BezierCurve,
    ];

    /// Wire name used in the `type` field of a scene element.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Image => "image",
            Self::Text => "text",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ring => "ring",
            Self::Sector => "sector",
            Self::Arc => "arc",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Line => "line",
            Self::BezierCurve => "bezierCurve",
        }
    }

    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the component instance that declared a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl SourceId {
    /// Allocates a fresh, process-unique source id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Explicit id or positional key as authored: either text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for IdentityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) if value.is_infinite() => {
                f.write_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // `-0` prints as `0` so both zeros resolve to the same id.
            Self::Number(value) if *value == 0.0 => f.write_str("0"),
            Self::Number(value) => {
                let magnitude = value.abs();
                if magnitude >= 1e21 || magnitude < 1e-6 {
                    write_exponential(f, *value)
                } else {
                    write!(f, "{value}")
                }
            }
        }
    }
}

/// Shortest exponential form with an explicit exponent sign: `1e+21`, `1.5e-7`.
fn write_exponential(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&formatted),
    }
}

impl From<&str> for IdentityValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for IdentityValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for IdentityValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for IdentityValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for IdentityValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<usize> for IdentityValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

/// Declared geometry, paint, transform and info attributes.
pub type PropMap = IndexMap<String, Value>;

/// Declared handlers keyed by the authored event name.
pub type HandlerMap = IndexMap<String, HandlerValue>;

/// Registration payload consumed by the collector.
#[derive(Debug, Clone)]
pub struct GraphicRegistration {
    pub id: String,
    pub kind: ElementKind,
    pub parent_id: Option<String>,
    pub props: PropMap,
    pub handlers: HandlerMap,
    /// Explicit render position; wins over any order hint.
    pub order: Option<i64>,
    /// Key under which the order tracker recorded this node's document position.
    pub order_key: Option<String>,
    pub source_id: SourceId,
}

impl GraphicRegistration {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ElementKind, source_id: SourceId) -> Self {
        Self {
            id: id.into(),
            kind,
            parent_id: None,
            props: PropMap::new(),
            handlers: HandlerMap::new(),
            order: None,
            order_key: None,
            source_id,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: Value) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_handler(mut self, event: impl Into<String>, value: HandlerValue) -> Self {
        self.handlers.insert(event.into(), value);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_order_key(mut self, order_key: impl Into<String>) -> Self {
        self.order_key = Some(order_key.into());
        self
    }
}

/// Active node held by the collector.
#[derive(Debug, Clone)]
pub struct GraphicNode {
    pub id: String,
    pub kind: ElementKind,
    pub parent_id: Option<String>,
    pub props: PropMap,
    pub handlers: HandlerMap,
    pub order: i64,
    pub source_id: SourceId,
}

impl GraphicNode {
    #[must_use]
    pub fn from_registration(registration: GraphicRegistration, order: i64) -> Self {
        Self {
            id: registration.id,
            kind: registration.kind,
            parent_id: registration.parent_id,
            props: registration.props,
            handlers: registration.handlers,
            order,
            source_id: registration.source_id,
        }
    }

    #[must_use]
    pub fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }
}
