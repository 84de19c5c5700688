use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

/// Anomaly reported by the reconciler instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphicWarning {
    /// Element declared without explicit id or positional key.
    MissingIdentity { instance: u64 },
    /// Two owners registered the same id in one render pass.
    DuplicateId { id: String },
    /// Element used without a mounted reconciler context.
    OutsideContext,
    /// Caller's option set the reconciler-owned key.
    OptionKeyCollision { key: String },
    /// A rebuilt scene was not pushed because updates are suspended.
    UpdateSuppressed,
}

impl fmt::Display for GraphicWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdentity { instance } => write!(
                f,
                "graphic element #{instance} has neither `id` nor `key`; its identity is not stable across re-renders"
            ),
            Self::DuplicateId { id } => write!(
                f,
                "duplicate graphic id `{id}` declared by two elements; the later declaration wins"
            ),
            Self::OutsideContext => {
                f.write_str("graphic element used outside a mounted chart graphic context")
            }
            Self::OptionKeyCollision { key } => write!(
                f,
                "option key `{key}` is managed by graphic elements; the value passed in the option is ignored"
            ),
            Self::UpdateSuppressed => f.write_str(
                "graphic scene changed while chart updates are manual; it is applied on the next option update",
            ),
        }
    }
}

static OUTSIDE_CONTEXT_REPORTED: AtomicBool = AtomicBool::new(false);

/// Reports `GraphicWarning::OutsideContext` once per process.
///
/// No collector, and so no `WarningLog`, exists for an element used outside a
/// mounted context. Returns `true` when the warning was emitted.
pub fn report_outside_context() -> bool {
    if OUTSIDE_CONTEXT_REPORTED.swap(true, Ordering::Relaxed) {
        return false;
    }
    warn!("{}", GraphicWarning::OutsideContext);
    true
}

#[derive(Debug, Default)]
struct WarningLogState {
    seen: HashSet<GraphicWarning>,
    emitted: Vec<GraphicWarning>,
}

/// Shared sink for reconciler warnings.
///
/// Every warning goes to `tracing` and is kept in emission order for
/// inspection. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct WarningLog {
    state: Rc<RefCell<WarningLogState>>,
}

impl WarningLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&self, warning: GraphicWarning) {
        warn!("{warning}");
        let mut state = self.state.borrow_mut();
        state.seen.insert(warning.clone());
        state.emitted.push(warning);
    }

    /// Emits `warning` unless the same cause was already reported.
    ///
    /// Returns `true` when the warning was emitted.
    pub fn warn_once(&self, warning: GraphicWarning) -> bool {
        if self.state.borrow().seen.contains(&warning) {
            return false;
        }
        self.warn(warning);
        true
    }

    #[must_use]
    pub fn emitted(&self) -> Vec<GraphicWarning> {
        self.state.borrow().emitted.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().emitted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().emitted.is_empty()
    }

    #[must_use]
    pub fn count_where(&self, predicate: impl Fn(&GraphicWarning) -> bool) -> usize {
        self.state
            .borrow()
            .emitted
            .iter()
            .filter(|warning| predicate(warning))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_context_is_reported_once_per_process() {
        let _ = report_outside_context();
        assert!(!report_outside_context());
        assert!(!report_outside_context());
    }

    #[test]
    fn warn_once_is_keyed_by_cause() {
        let log = WarningLog::new();
        assert!(log.warn_once(GraphicWarning::UpdateSuppressed));
        assert!(!log.warn_once(GraphicWarning::UpdateSuppressed));
        assert!(log.warn_once(GraphicWarning::OptionKeyCollision {
            key: "graphic".to_owned()
        }));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn plain_warn_always_records() {
        let log = WarningLog::new();
        let duplicate = GraphicWarning::DuplicateId { id: "a".to_owned() };
        log.warn(duplicate.clone());
        log.warn(duplicate.clone());
        assert_eq!(log.count_where(|warning| *warning == duplicate), 2);
    }
}
