use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::ChartEvent;
use crate::error::{GraphicError, GraphicResult};

use super::chart_host::{ChartHost, ChartListener, ChartOption, UpdateRequest};

#[derive(Default)]
struct NullChartState {
    updates: Vec<(ChartOption, UpdateRequest)>,
    listeners: IndexMap<String, ChartListener>,
    bind_count: usize,
    unbind_count: usize,
    fail_next_update: Option<String>,
}

/// Headless chart host used by tests and server-side rendering.
///
/// Records every pushed option and bound listener. Clones share state, so a
/// test can keep a handle while the reconciler owns another.
#[derive(Clone, Default)]
pub struct NullChart {
    state: Rc<RefCell<NullChartState>>,
}

impl NullChart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn update_count(&self) -> usize {
        self.state.borrow().updates.len()
    }

    #[must_use]
    pub fn last_option(&self) -> Option<ChartOption> {
        self.state
            .borrow()
            .updates
            .last()
            .map(|(option, _)| option.clone())
    }

    #[must_use]
    pub fn last_request(&self) -> Option<UpdateRequest> {
        self.state
            .borrow()
            .updates
            .last()
            .map(|(_, request)| request.clone())
    }

    /// Event names with a bound listener, in bind order.
    #[must_use]
    pub fn listener_names(&self) -> Vec<String> {
        self.state.borrow().listeners.keys().cloned().collect()
    }

    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.state.borrow().bind_count
    }

    #[must_use]
    pub fn unbind_count(&self) -> usize {
        self.state.borrow().unbind_count
    }

    /// Makes the next `set_option` call fail with `message`.
    pub fn fail_next_update(&self, message: impl Into<String>) {
        self.state.borrow_mut().fail_next_update = Some(message.into());
    }

    /// Fires `event` at the listener bound for its name.
    ///
    /// Returns `false` when no listener is bound.
    pub fn emit(&self, event: &ChartEvent) -> bool {
        let listener = self.state.borrow().listeners.get(&event.name).cloned();
        match listener {
            Some(listener) => {
                listener(event);
                true
            }
            None => false,
        }
    }
}

impl ChartHost for NullChart {
    fn set_option(&mut self, option: &ChartOption, request: &UpdateRequest) -> GraphicResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.fail_next_update.take() {
            return Err(GraphicError::Host(message));
        }
        state.updates.push((option.clone(), request.clone()));
        Ok(())
    }

    fn on(&mut self, event: &str, listener: ChartListener) {
        let mut state = self.state.borrow_mut();
        state.listeners.insert(event.to_owned(), listener);
        state.bind_count += 1;
    }

    fn off(&mut self, event: &str) {
        let mut state = self.state.borrow_mut();
        if state.listeners.shift_remove(event).is_some() {
            state.unbind_count += 1;
        }
    }
}
