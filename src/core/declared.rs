use serde_json::Value;

use super::event::HandlerValue;
use super::order::{DescriptorKind, GraphicDescriptor};
use super::types::{ElementKind, HandlerMap, IdentityValue, PropMap};

/// Concrete declared tree for hosts without their own descriptor type.
#[derive(Debug, Clone)]
pub enum Declared {
    Element(DeclaredElement),
    Fragment(Vec<Declared>),
    Other,
}

impl Declared {
    #[must_use]
    pub fn fragment(entries: impl IntoIterator<Item = Declared>) -> Self {
        Self::Fragment(entries.into_iter().collect())
    }
}

impl From<DeclaredElement> for Declared {
    fn from(element: DeclaredElement) -> Self {
        Self::Element(element)
    }
}

/// One graphic element as authored, before it registers itself.
#[derive(Debug, Clone)]
pub struct DeclaredElement {
    pub kind: ElementKind,
    pub id: Option<IdentityValue>,
    pub key: Option<IdentityValue>,
    pub props: PropMap,
    pub handlers: HandlerMap,
    pub children: Vec<Declared>,
}

impl DeclaredElement {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            key: None,
            props: PropMap::new(),
            handlers: HandlerMap::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn group() -> Self {
        Self::new(ElementKind::Group)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<IdentityValue>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<IdentityValue>) -> Self {
        self.key = Some(key.into());
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
    pub fn with_child(mut self, child: impl Into<Declared>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Declared>) -> Self {
        self.children.extend(children);
        self
    }
}

impl GraphicDescriptor for Declared {
    fn descriptor_kind(&self) -> DescriptorKind {
        match self {
            Self::Element(element) => DescriptorKind::Element(element.kind),
            Self::Fragment(_) => DescriptorKind::Fragment,
            Self::Other => DescriptorKind::Other,
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            Self::Element(element) => &element.children,
            Self::Fragment(entries) => entries,
            Self::Other => &[],
        }
    }

    fn explicit_id(&self) -> Option<&IdentityValue> {
        match self {
            Self::Element(element) => element.id.as_ref(),
            _ => None,
        }
    }

    fn positional_key(&self) -> Option<&IdentityValue> {
        match self {
            Self::Element(element) => element.key.as_ref(),
            _ => None,
        }
    }
}
