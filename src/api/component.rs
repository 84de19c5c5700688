use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{DeclaredElement, GraphicRegistration, SourceId, resolve};

use super::collector::GraphicCollector;
use super::warnings::{GraphicWarning, report_outside_context};

static NEXT_INSTANCE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Ambient context through which graphic elements reach their collector.
///
/// Groups hand a nested context to their children so registrations carry the
/// group's id as parent.
#[derive(Clone)]
pub struct GraphicContext {
    collector: GraphicCollector,
    parent_id: Option<String>,
}

impl GraphicContext {
    #[must_use]
    pub fn new(collector: GraphicCollector) -> Self {
        Self {
            collector,
            parent_id: None,
        }
    }

    #[must_use]
    pub fn collector(&self) -> &GraphicCollector {
        &self.collector
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Context for the children of group `group_id`.
    #[must_use]
    pub fn nested(&self, group_id: impl Into<String>) -> Self {
        Self {
            collector: self.collector.clone(),
            parent_id: Some(group_id.into()),
        }
    }
}

/// One mounted graphic element: the owner of a registered node.
///
/// `update` registers the current declaration on every render; dropping or
/// `unmount` removes the node unless another element has claimed its id.
pub struct GraphicElement {
    context: Option<GraphicContext>,
    source_id: SourceId,
    instance_seq: u64,
    registered_id: Option<String>,
}

impl GraphicElement {
    #[must_use]
    pub fn new(context: Option<GraphicContext>) -> Self {
        Self {
            context,
            source_id: SourceId::next(),
            instance_seq: NEXT_INSTANCE_SEQ.fetch_add(1, Ordering::Relaxed),
            registered_id: None,
        }
    }

    #[must_use]
    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    #[must_use]
    pub fn registered_id(&self) -> Option<&str> {
        self.registered_id.as_deref()
    }

    /// Registers `declared` and returns the resolved id.
    ///
    /// Returns `None` without a mounted context. When the resolved id changes
    /// between renders the node under the old id is released first.
    pub fn update(&mut self, declared: &DeclaredElement) -> Option<String> {
        let Some(context) = &self.context else {
            report_outside_context();
            return None;
        };
        let collector = context.collector();

        let identity = resolve(declared.id.as_ref(), declared.key.as_ref(), self.instance_seq);
        if identity.missing_identity {
            collector
                .warnings()
                .warn_once(GraphicWarning::MissingIdentity {
                    instance: self.instance_seq,
                });
        }

        if let Some(previous) = self.registered_id.take() {
            if previous != identity.id {
                collector.unregister(&previous, Some(self.source_id));
            }
        }

        collector.register(GraphicRegistration {
            id: identity.id.clone(),
            kind: declared.kind,
            parent_id: context.parent_id.clone(),
            props: declared.props.clone(),
            handlers: declared.handlers.clone(),
            order: None,
            order_key: identity.order_key,
            source_id: self.source_id,
        });
        self.registered_id = Some(identity.id.clone());
        Some(identity.id)
    }

    /// Context for this element's declared children, once it has registered.
    #[must_use]
    pub fn child_context(&self) -> Option<GraphicContext> {
        let context = self.context.as_ref()?;
        let id = self.registered_id.as_ref()?;
        Some(context.nested(id.clone()))
    }

    /// Releases the registered node. Safe to call more than once.
    pub fn unmount(&mut self) {
        let Some(id) = self.registered_id.take() else {
            return;
        };
        if let Some(context) = &self.context {
            context.collector().unregister(&id, Some(self.source_id));
        }
    }
}

impl Drop for GraphicElement {
    fn drop(&mut self) {
        self.unmount();
    }
}
