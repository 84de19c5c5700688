use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{GraphicNode, GraphicRegistration, OrderMap, SourceId};

use super::flush_scheduler::FlushScheduler;
use super::warnings::{GraphicWarning, WarningLog};

/// Receives the active nodes once per coalesced flush.
pub type FlushCallback = Box<dyn FnMut(&[GraphicNode])>;

#[derive(Default)]
struct CollectorState {
    nodes: IndexMap<String, GraphicNode>,
    pass_owners: HashMap<String, SourceId>,
    pass_duplicates: HashSet<String>,
    order_hints: OrderMap,
    order_counter: i64,
    flush_pending: bool,
    flush_count: u64,
    disposed: bool,
}

struct CollectorInner {
    state: RefCell<CollectorState>,
    on_flush: RefCell<Option<FlushCallback>>,
    scheduler: Rc<dyn FlushScheduler>,
    warnings: WarningLog,
}

/// Registry of the graphic nodes currently declared for one chart.
///
/// Mutations never flush synchronously: the first mutation after a flush
/// queues one task on the scheduler and later mutations fold into it.
/// Clones are handles onto the same registry.
#[derive(Clone)]
pub struct GraphicCollector {
    inner: Rc<CollectorInner>,
}

impl GraphicCollector {
    #[must_use]
    pub fn new(scheduler: Rc<dyn FlushScheduler>, warnings: WarningLog) -> Self {
        Self {
            inner: Rc::new(CollectorInner {
                state: RefCell::new(CollectorState::default()),
                on_flush: RefCell::new(None),
                scheduler,
                warnings,
            }),
        }
    }

    /// Installs the callback run by each flush, replacing any previous one.
    pub fn set_flush_handler(&self, handler: impl FnMut(&[GraphicNode]) + 'static) {
        if self.is_disposed() {
            return;
        }
        *self.inner.on_flush.borrow_mut() = Some(Box::new(handler));
    }

    /// Starts a render pass: forgets per-pass owners and restarts the order counter.
    pub fn begin_pass(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.pass_owners.clear();
        state.pass_duplicates.clear();
        state.order_counter = 0;
    }

    /// Replaces the document-position hints consulted by `register`.
    pub fn set_order_hints(&self, hints: OrderMap) {
        let mut state = self.inner.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.order_hints = hints;
    }

    /// Inserts or overwrites the node `registration.id`.
    ///
    /// The render position is the explicit `order` if given, else the hint
    /// recorded for `order_key`, else the running counter, which only advances
    /// when it supplies the position.
    pub fn register(&self, registration: GraphicRegistration) {
        let duplicate = {
            let mut guard = self.inner.state.borrow_mut();
            let state = &mut *guard;
            if state.disposed {
                return;
            }

            let id = registration.id.clone();
            let previous_owner = state
                .pass_owners
                .insert(id.clone(), registration.source_id);
            let duplicate = previous_owner
                .is_some_and(|previous| previous != registration.source_id)
                && state.pass_duplicates.insert(id.clone());

            let order = registration
                .order
                .or_else(|| {
                    registration
                        .order_key
                        .as_ref()
                        .and_then(|key| state.order_hints.get(key).copied())
                })
                .unwrap_or_else(|| {
                    let next = state.order_counter;
                    state.order_counter += 1;
                    next
                });

            trace!(id = %id, order, "register graphic node");
            state
                .nodes
                .insert(id.clone(), GraphicNode::from_registration(registration, order));
            duplicate.then_some(id)
        };

        if let Some(id) = duplicate {
            self.inner.warnings.warn(GraphicWarning::DuplicateId { id });
        }
        self.schedule_flush();
    }

    /// Removes node `id` when `source_id` is `None` or owns it.
    ///
    /// Returns `true` when a node was removed.
    pub fn unregister(&self, id: &str, source_id: Option<SourceId>) -> bool {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            if state.disposed {
                return false;
            }
            let owned = state
                .nodes
                .get(id)
                .is_some_and(|node| source_id.is_none_or(|source| node.source_id == source));
            owned && state.nodes.shift_remove(id).is_some()
        };
        if removed {
            trace!(id, "unregister graphic node");
            self.schedule_flush();
        }
        removed
    }

    /// Snapshot of the active nodes in registration order.
    #[must_use]
    pub fn nodes(&self) -> Vec<GraphicNode> {
        self.inner.state.borrow().nodes.values().cloned().collect()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<GraphicNode> {
        self.inner.state.borrow().nodes.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.borrow().nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().nodes.is_empty()
    }

    #[must_use]
    pub fn is_flush_pending(&self) -> bool {
        self.inner.state.borrow().flush_pending
    }

    /// Number of flushes run so far.
    #[must_use]
    pub fn flush_count(&self) -> u64 {
        self.inner.state.borrow().flush_count
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }

    #[must_use]
    pub fn warnings(&self) -> &WarningLog {
        &self.inner.warnings
    }

    /// Runs a pending flush immediately. The queued task then does nothing.
    pub fn flush_now(&self) {
        self.inner.flush();
    }

    /// Drops every node and the flush callback; later calls are no-ops.
    pub fn dispose(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            *state = CollectorState {
                disposed: true,
                flush_count: state.flush_count,
                ..CollectorState::default()
            };
        }
        self.inner.on_flush.borrow_mut().take();
    }

    fn schedule_flush(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.disposed || state.flush_pending {
                return;
            }
            state.flush_pending = true;
        }
        trace!("scheduling graphic flush");
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.schedule(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.flush();
            }
        }));
    }
}

impl CollectorInner {
    fn flush(&self) {
        let nodes: Vec<GraphicNode> = {
            let mut state = self.state.borrow_mut();
            if state.disposed || !state.flush_pending {
                return;
            }
            state.flush_pending = false;
            state.flush_count += 1;
            state.nodes.values().cloned().collect()
        };

        // The callback runs unborrowed so it may read or mutate the registry.
        let callback = self.on_flush.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(&nodes);
            let disposed = self.state.borrow().disposed;
            let mut slot = self.on_flush.borrow_mut();
            if slot.is_none() && !disposed {
                *slot = Some(callback);
            }
        }
    }
}
