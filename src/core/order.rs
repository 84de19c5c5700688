use std::collections::HashMap;

use super::identity::order_key_for;
use super::types::{ElementKind, IdentityValue};

/// Classification of one entry in a declared subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// A graphic element declaration.
    Element(ElementKind),
    /// A transparent container (fragment, list, conditional block) whose
    /// children are visited in place.
    Fragment,
    /// Anything else: text, comments, foreign components. Skipped.
    Other,
}

/// Read-only view of a host framework's declared tree.
///
/// Host frameworks implement this on their own node type so the ordering walk
/// stays independent of any particular component model.
pub trait GraphicDescriptor: Sized {
    fn descriptor_kind(&self) -> DescriptorKind;

    /// Fragment entries, or the declared children of a group element.
    fn children(&self) -> &[Self];

    fn explicit_id(&self) -> Option<&IdentityValue>;

    fn positional_key(&self) -> Option<&IdentityValue>;
}

/// Document positions keyed by order key (`id:<id>` or `key:<key>`).
pub type OrderMap = HashMap<String, i64>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderCollection {
    pub order_map: OrderMap,
    pub next_position: i64,
}

/// Computes the intended document position of every graphic element in
/// `entries`, depth first, starting at `position`.
///
/// Each element consumes one position whether or not it carries an identity;
/// only identified elements are recorded. A group's children are numbered
/// directly after the group itself. Later duplicates of a key overwrite earlier
/// ones.
#[must_use]
pub fn collect_order<D: GraphicDescriptor>(entries: &[D], position: i64) -> OrderCollection {
    let mut collection = OrderCollection {
        order_map: OrderMap::new(),
        next_position: position,
    };
    for entry in entries {
        visit(entry, &mut collection);
    }
    collection
}

fn visit<D: GraphicDescriptor>(entry: &D, collection: &mut OrderCollection) {
    match entry.descriptor_kind() {
        DescriptorKind::Fragment => {
            for child in entry.children() {
                visit(child, collection);
            }
        }
        DescriptorKind::Element(kind) => {
            if let Some(key) = order_key_for(entry.explicit_id(), entry.positional_key()) {
                collection.order_map.insert(key, collection.next_position);
            }
            collection.next_position += 1;
            if kind.is_group() {
                for child in entry.children() {
                    visit(child, collection);
                }
            }
        }
        DescriptorKind::Other => {}
    }
}
