use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::core::{ChartEvent, GraphicDescriptor, GraphicNode, collect_order};
use crate::error::GraphicResult;
use crate::interaction::EventDispatcher;
use crate::render::{ChartHost, ChartOption, GraphicSlot, SceneTree, UpdateRequest, build_scene};

use super::collector::GraphicCollector;
use super::component::GraphicContext;
use super::config::GraphicConfig;
use super::flush_scheduler::FlushScheduler;
use super::warnings::{GraphicWarning, WarningLog};

/// Hidden container produced by `GraphicIntegration::render`.
///
/// It renders nothing itself; it only carries the context through which the
/// declared elements reach the collector.
#[derive(Clone)]
pub struct MountDescriptor {
    pub context: GraphicContext,
    pub hidden: bool,
    /// Document positions consumed by the declared subtree.
    pub positions: i64,
}

struct IntegrationState<C> {
    chart: C,
    config: GraphicConfig,
    dispatcher: EventDispatcher,
    last_scene: SceneTree,
    has_subtree: bool,
    manual_update: bool,
    disposed: bool,
}

/// Binds one collector to one chart.
///
/// Each flush rebuilds the scene, reconciles event listeners and pushes the
/// scene to the chart with replace semantics for the graphics key, unless
/// updates are suspended.
pub struct GraphicIntegration<C: ChartHost + 'static> {
    collector: GraphicCollector,
    shared: Rc<RefCell<IntegrationState<C>>>,
    warnings: WarningLog,
}

impl<C: ChartHost + 'static> GraphicIntegration<C> {
    pub fn new(
        chart: C,
        config: GraphicConfig,
        scheduler: Rc<dyn FlushScheduler>,
    ) -> GraphicResult<Self> {
        let config = config.validate()?;
        let warnings = WarningLog::new();
        let collector = GraphicCollector::new(scheduler, warnings.clone());
        let shared = Rc::new(RefCell::new(IntegrationState {
            chart,
            last_scene: SceneTree::empty(config.root_id.clone()),
            manual_update: config.manual_update,
            config,
            dispatcher: EventDispatcher::new(),
            has_subtree: false,
            disposed: false,
        }));

        let weak: Weak<RefCell<IntegrationState<C>>> = Rc::downgrade(&shared);
        let flush_warnings = warnings.clone();
        collector.set_flush_handler(move |nodes| {
            if let Some(shared) = weak.upgrade() {
                apply_flush(&shared, nodes, &flush_warnings);
            }
        });

        Ok(Self {
            collector,
            shared,
            warnings,
        })
    }

    #[must_use]
    pub fn collector(&self) -> &GraphicCollector {
        &self.collector
    }

    /// Root context for elements declared directly under the chart.
    #[must_use]
    pub fn context(&self) -> GraphicContext {
        GraphicContext::new(self.collector.clone())
    }

    #[must_use]
    pub fn warnings(&self) -> &WarningLog {
        &self.warnings
    }

    /// Starts a render pass over `subtree`.
    ///
    /// Computes order hints for the declared elements and resets per-pass
    /// state. `None` means no graphic subtree is supplied any more: option
    /// patching stops and no mount is produced.
    pub fn render<D: GraphicDescriptor>(&self, subtree: Option<&[D]>) -> Option<MountDescriptor> {
        let Some(entries) = subtree else {
            self.shared.borrow_mut().has_subtree = false;
            return None;
        };
        {
            let mut state = self.shared.borrow_mut();
            if state.disposed {
                return None;
            }
            state.has_subtree = true;
        }

        let order = collect_order(entries, 0);
        self.collector.begin_pass();
        self.collector.set_order_hints(order.order_map);
        Some(MountDescriptor {
            context: self.context(),
            hidden: true,
            positions: order.next_position,
        })
    }

    /// Installs the last built scene under the graphics key of `option`.
    ///
    /// Returns `option` untouched when no subtree is supplied. A caller value
    /// under the graphics key is discarded.
    #[must_use]
    pub fn patch_option(&self, option: ChartOption) -> ChartOption {
        let state = self.shared.borrow();
        if !state.has_subtree || state.disposed {
            return option;
        }
        let key = &state.config.graphics_key;
        let mut option = option;
        let collides = option.fields.remove(key).is_some()
            || option.graphic.as_ref().is_some_and(|slot| &slot.key == key);
        if collides {
            self.warnings.warn_once(GraphicWarning::OptionKeyCollision { key: key.clone() });
        }
        option.graphic = Some(GraphicSlot {
            key: key.clone(),
            tree: state.last_scene.clone(),
        });
        option
    }

    /// Externally triggered update: pushes `option` patched with the latest
    /// scene, adding replace semantics for the graphics key to `planned`.
    ///
    /// Works in manual-update mode too.
    pub fn set_option(&self, option: ChartOption, planned: UpdateRequest) -> GraphicResult<()> {
        let option = self.patch_option(option);
        let mut state = self.shared.borrow_mut();
        let request = if option.graphic.is_some() {
            planned.with_replace_merge(&state.config.graphics_key)
        } else {
            planned
        };
        state.chart.set_option(&option, &request)
    }

    /// Suspends (`true`) or resumes pushing flushed scenes to the chart.
    pub fn set_manual_update(&self, manual_update: bool) {
        self.shared.borrow_mut().manual_update = manual_update;
    }

    #[must_use]
    pub fn is_manual_update(&self) -> bool {
        self.shared.borrow().manual_update
    }

    #[must_use]
    pub fn last_scene(&self) -> SceneTree {
        self.shared.borrow().last_scene.clone()
    }

    #[must_use]
    pub fn bound_events(&self) -> Vec<String> {
        self.shared
            .borrow()
            .dispatcher
            .bound_events()
            .map(str::to_owned)
            .collect()
    }

    /// Routes `event` to the current handlers of the node it carries.
    pub fn dispatch(&self, event: &ChartEvent) -> bool {
        let router = self.shared.borrow().dispatcher.router();
        router.dispatch(event)
    }

    pub fn with_chart<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.shared.borrow().chart)
    }

    #[must_use]
    pub fn config(&self) -> GraphicConfig {
        self.shared.borrow().config.clone()
    }

    /// Tears down the collector and every chart listener. Later calls are no-ops.
    pub fn dispose(&self) {
        self.collector.dispose();
        let mut guard = self.shared.borrow_mut();
        let state = &mut *guard;
        if state.disposed {
            return;
        }
        state.dispatcher.unbind_all(&mut state.chart);
        state.last_scene = SceneTree::empty(state.config.root_id.clone());
        state.has_subtree = false;
        state.disposed = true;
        debug!("graphic integration disposed");
    }
}

fn apply_flush<C: ChartHost>(
    shared: &RefCell<IntegrationState<C>>,
    nodes: &[GraphicNode],
    warnings: &WarningLog,
) {
    let mut guard = shared.borrow_mut();
    let state = &mut *guard;
    if state.disposed {
        return;
    }

    state.last_scene = build_scene(nodes, &state.config.root_id);
    state.dispatcher.sync(nodes, &mut state.chart);

    if state.manual_update {
        warnings.warn_once(GraphicWarning::UpdateSuppressed);
        return;
    }

    let key = state.config.graphics_key.clone();
    let option = ChartOption {
        fields: Default::default(),
        graphic: Some(GraphicSlot {
            key: key.clone(),
            tree: state.last_scene.clone(),
        }),
    };
    let request = UpdateRequest::default().with_replace_merge(&key);
    if let Err(err) = state.chart.set_option(&option, &request) {
        warn!(error = %err, "failed to push graphic scene to chart");
    }
}
