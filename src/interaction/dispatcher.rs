use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::core::{ChartEvent, EventHandler, GraphicNode};
use crate::render::{ChartHost, ChartListener};

use super::handlers::normalize_handlers;

/// Current handlers per node id, per event name.
type HandlerTable = HashMap<String, IndexMap<String, EventHandler>>;

/// Listener set change applied by one `sync`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerDelta {
    pub bound: Vec<String>,
    pub unbound: Vec<String>,
}

impl ListenerDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty() && self.unbound.is_empty()
    }
}

/// Routes chart-level events to the handlers currently declared on each node.
///
/// One listener is bound per event name in use. Listeners look handlers up by
/// the correlation id of the fired element at call time, so replacing a
/// handler never requires rebinding; only a change in the set of event names
/// does.
#[derive(Default)]
pub struct EventDispatcher {
    table: Rc<RefCell<HandlerTable>>,
    bound: IndexSet<String>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the handler table from `nodes` and reconciles chart listeners.
    pub fn sync<C: ChartHost + ?Sized>(
        &mut self,
        nodes: &[GraphicNode],
        chart: &mut C,
    ) -> ListenerDelta {
        let mut table = HandlerTable::new();
        let mut in_use = IndexSet::new();
        for node in nodes {
            let handlers = normalize_handlers(&node.handlers);
            if handlers.is_empty() {
                continue;
            }
            in_use.extend(handlers.keys().cloned());
            table.insert(node.id.clone(), handlers);
        }
        *self.table.borrow_mut() = table;

        let mut delta = ListenerDelta::default();
        let stale: Vec<String> = self
            .bound
            .iter()
            .filter(|event| !in_use.contains(*event))
            .cloned()
            .collect();
        for event in stale {
            chart.off(&event);
            self.bound.shift_remove(&event);
            delta.unbound.push(event);
        }
        for event in in_use {
            if self.bound.contains(&event) {
                continue;
            }
            chart.on(&event, self.listener(&event));
            self.bound.insert(event.clone());
            delta.bound.push(event);
        }

        if !delta.is_empty() {
            debug!(
                bound = ?delta.bound,
                unbound = ?delta.unbound,
                "rebinding graphic event listeners"
            );
        }
        delta
    }

    /// Routes `event` under its own name. Returns `true` when a handler ran.
    pub fn dispatch(&self, event: &ChartEvent) -> bool {
        route(&self.table, &event.name, event)
    }

    /// Detached handle onto the live handler table.
    #[must_use]
    pub fn router(&self) -> EventRouter {
        EventRouter {
            table: Rc::clone(&self.table),
        }
    }

    /// Event names with a bound chart listener, in bind order.
    pub fn bound_events(&self) -> impl Iterator<Item = &str> {
        self.bound.iter().map(String::as_str)
    }

    #[must_use]
    pub fn has_handler(&self, node_id: &str, event: &str) -> bool {
        self.table
            .borrow()
            .get(node_id)
            .is_some_and(|handlers| handlers.contains_key(event))
    }

    /// Unbinds every listener and forgets all handlers.
    pub fn unbind_all<C: ChartHost + ?Sized>(&mut self, chart: &mut C) {
        for event in self.bound.drain(..) {
            chart.off(&event);
        }
        self.table.borrow_mut().clear();
    }

    fn listener(&self, event: &str) -> ChartListener {
        let table: Weak<RefCell<HandlerTable>> = Rc::downgrade(&self.table);
        let name = event.to_owned();
        Rc::new(move |fired: &ChartEvent| {
            if let Some(table) = table.upgrade() {
                route(&table, &name, fired);
            }
        })
    }
}

/// Cloneable view of a dispatcher's handler table.
///
/// Lets callers route events without holding a borrow of the owner of the
/// dispatcher while user handlers run.
#[derive(Clone)]
pub struct EventRouter {
    table: Rc<RefCell<HandlerTable>>,
}

impl EventRouter {
    pub fn dispatch(&self, event: &ChartEvent) -> bool {
        route(&self.table, &event.name, event)
    }
}

fn route(table: &RefCell<HandlerTable>, event: &str, fired: &ChartEvent) -> bool {
    let Some(node_id) = fired.correlation_id() else {
        return false;
    };
    // Release the table before running user code; handlers may re-enter.
    let handler = table
        .borrow()
        .get(node_id)
        .and_then(|handlers| handlers.get(event))
        .cloned();
    match handler {
        Some(handler) => {
            handler(fired);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ElementKind, GraphicRegistration, HandlerValue, SourceId};
    use crate::render::NullChart;

    fn node(id: &str, events: &[&str]) -> GraphicNode {
        let mut registration = GraphicRegistration::new(id, ElementKind::Rect, SourceId(1));
        for event in events {
            registration = registration.with_handler(*event, HandlerValue::function(|_| {}));
        }
        GraphicNode::from_registration(registration, 0)
    }

    #[test]
    fn sync_reports_listener_delta() {
        let mut chart = NullChart::new();
        let mut dispatcher = EventDispatcher::new();

        let delta = dispatcher.sync(&[node("a", &["onClick", "mouseover"])], &mut chart);
        assert_eq!(delta.bound, vec!["click", "mouseover"]);
        assert!(delta.unbound.is_empty());
        assert!(dispatcher.has_handler("a", "click"));

        let delta = dispatcher.sync(&[node("a", &["onClick"])], &mut chart);
        assert_eq!(delta.unbound, vec!["mouseover"]);
        assert!(!dispatcher.has_handler("a", "mouseover"));

        assert!(dispatcher.sync(&[node("b", &["click"])], &mut chart).is_empty());
        assert!(!dispatcher.has_handler("a", "click"));
        assert!(dispatcher.has_handler("b", "click"));
    }
}
