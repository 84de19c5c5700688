use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved `info` key carrying the id of the node an element was built from.
///
/// Inbound events are routed by reading this key back out of the fired
/// element's `info`, so its name is part of the wire contract.
pub const CORRELATION_ID_KEY: &str = "correlationId";

/// Interaction event fired by the chart host.
///
/// `info` mirrors the `info` payload of the element that was hit; the
/// reconciler reads its correlation id back out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEvent {
    pub name: String,
    #[serde(default)]
    pub info: Option<Value>,
    #[serde(default)]
    pub payload: Value,
}

impl ChartEvent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: None,
            payload: Value::Null,
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: Value) -> Self {
        self.info = Some(info);
        self
    }

    /// Node id carried by the event's `info`, if any.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.info
            .as_ref()?
            .get(CORRELATION_ID_KEY)?
            .as_str()
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Callable attached to an element event.
pub type EventHandler = Rc<dyn Fn(&ChartEvent)>;

/// Declared handler value as authored on a graphic element.
///
/// Declarations are loosely typed: anything that is not a function (an
/// `Opaque` value, possibly nested inside a `List`) is ignored when handlers
/// are normalized.
#[derive(Clone)]
pub enum HandlerValue {
    Function(EventHandler),
    List(Vec<HandlerValue>),
    Once(Box<HandlerValue>),
    Opaque(Value),
}

impl HandlerValue {
    #[must_use]
    pub fn function(handler: impl Fn(&ChartEvent) + 'static) -> Self {
        Self::Function(Rc::new(handler))
    }

    #[must_use]
    pub fn once(handler: impl Fn(&ChartEvent) + 'static) -> Self {
        Self::Once(Box::new(Self::function(handler)))
    }

    #[must_use]
    pub fn list(values: impl IntoIterator<Item = HandlerValue>) -> Self {
        Self::List(values.into_iter().collect())
    }

    /// Appends every function reachable from this value, in declaration order.
    pub fn collect_functions(&self, out: &mut Vec<EventHandler>) {
        match self {
            Self::Function(handler) => out.push(Rc::clone(handler)),
            Self::List(values) => {
                for value in values {
                    value.collect_functions(out);
                }
            }
            Self::Once(inner) => inner.collect_functions(out),
            Self::Opaque(_) => {}
        }
    }
}

impl fmt::Debug for HandlerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(handler) => write!(f, "Function({:p})", Rc::as_ptr(handler)),
            Self::List(values) => f.debug_tuple("List").field(values).finish(),
            Self::Once(inner) => f.debug_tuple("Once").field(inner).finish(),
            Self::Opaque(value) => f.debug_tuple("Opaque").field(value).finish(),
        }
    }
}
