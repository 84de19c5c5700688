pub mod declared;
pub mod event;
pub mod identity;
pub mod order;
pub mod types;

pub use declared::{Declared, DeclaredElement};
pub use event::{CORRELATION_ID_KEY, ChartEvent, EventHandler, HandlerValue};
pub use identity::{ResolvedIdentity, SYNTHETIC_ID_PREFIX, resolve};
pub use order::{DescriptorKind, GraphicDescriptor, OrderCollection, OrderMap, collect_order};
pub use types::{
    ElementKind, GraphicNode, GraphicRegistration, HandlerMap, IdentityValue, PropMap, SourceId,
};
