use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::core::{ChartEvent, EventHandler, HandlerMap};

/// Event name resolved from an authored handler name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEventName {
    pub event: String,
    /// Authored with a `Once` suffix.
    pub once: bool,
}

/// Resolves an authored handler name to the host's event name.
///
/// Accepts plain names (`click`), framework-style names (`onClick`,
/// `onMouseOverOnce`) and the host's own field form for known events
/// (`onclick`). Event names are lowercased. Returns `None` for an empty name.
#[must_use]
pub fn normalize_event_name(declared: &str) -> Option<NormalizedEventName> {
    let name = match declared.strip_prefix("on") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        Some(rest) if is_host_event(rest.strip_suffix("Once").unwrap_or(rest)) => rest,
        _ => declared,
    };
    let (name, once) = match name.strip_suffix("Once") {
        Some(rest) if !rest.is_empty() => (rest, true),
        _ => (name, false),
    };

    if name.is_empty() {
        return None;
    }
    Some(NormalizedEventName {
        event: name.to_lowercase(),
        once,
    })
}

/// Pointer events the chart host fires on graphic elements.
pub const HOST_EVENTS: &[&str] = &[
    "click",
    "dblclick",
    "mousedown",
    "mousemove",
    "mouseup",
    "mouseover",
    "mouseout",
    "mousewheel",
    "contextmenu",
    "globalout",
    "drag",
    "dragstart",
    "dragend",
    "dragenter",
    "dragleave",
    "dragover",
    "drop",
];

fn is_host_event(name: &str) -> bool {
    HOST_EVENTS
        .iter()
        .any(|event| event.eq_ignore_ascii_case(name))
}

/// Element field holding the callback for `event`, e.g. `click` -> `onclick`.
#[must_use]
pub fn event_field_name(event: &str) -> String {
    format!("on{}", event.to_lowercase())
}

/// Collapses declared handlers into one callable per event name.
///
/// Functions declared for the same event, directly or through several
/// authored names, run in declaration order on every firing. Non-function
/// entries are dropped; an event left without functions is omitted. The once
/// variant is chained like any other function and keeps firing after its
/// first invocation.
#[must_use]
pub fn normalize_handlers(handlers: &HandlerMap) -> IndexMap<String, EventHandler> {
    let mut grouped: IndexMap<String, Vec<EventHandler>> = IndexMap::new();
    for (declared, value) in handlers {
        let Some(name) = normalize_event_name(declared) else {
            continue;
        };
        let mut functions = Vec::new();
        value.collect_functions(&mut functions);
        if functions.is_empty() {
            continue;
        }
        grouped.entry(name.event).or_default().extend(functions);
    }

    grouped
        .into_iter()
        .map(|(event, functions)| (event, chain(functions)))
        .collect()
}

fn chain(mut functions: Vec<EventHandler>) -> EventHandler {
    if functions.len() == 1 {
        return functions.remove(0);
    }
    let functions: SmallVec<[EventHandler; 4]> = functions.into_iter().collect();
    Rc::new(move |event: &ChartEvent| {
        for function in &functions {
            function(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_style_names_are_normalized() {
        assert_eq!(
            normalize_event_name("onClick"),
            Some(NormalizedEventName {
                event: "click".to_owned(),
                once: false
            })
        );
        assert_eq!(
            normalize_event_name("onMouseOverOnce"),
            Some(NormalizedEventName {
                event: "mouseover".to_owned(),
                once: true
            })
        );
        assert_eq!(normalize_event_name("dblclick").map(|n| n.event), Some("dblclick".to_owned()));
        assert_eq!(normalize_event_name("once").map(|n| n.event), Some("once".to_owned()));
        assert_eq!(normalize_event_name(""), None);
    }

    #[test]
    fn host_field_form_is_normalized_for_known_events() {
        assert_eq!(normalize_event_name("onclick").map(|n| n.event), Some("click".to_owned()));
        assert_eq!(
            normalize_event_name("onmouseoverOnce"),
            Some(NormalizedEventName {
                event: "mouseover".to_owned(),
                once: true
            })
        );
        assert_eq!(normalize_event_name("online").map(|n| n.event), Some("online".to_owned()));
    }

    #[test]
    fn field_name_lowercases_and_prefixes() {
        assert_eq!(event_field_name("click"), "onclick");
        assert_eq!(event_field_name("mouseOver"), "onmouseover");
    }
}
