//! Event handler normalization and inbound event routing.

mod dispatcher;
mod handlers;

pub use dispatcher::{EventDispatcher, EventRouter, ListenerDelta};
pub use handlers::{
    HOST_EVENTS, NormalizedEventName, event_field_name, normalize_event_name, normalize_handlers,
};
