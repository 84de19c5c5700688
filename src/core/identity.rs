use super::types::IdentityValue;

/// Prefix of ids synthesized for elements declared without id or key.
pub const SYNTHETIC_ID_PREFIX: &str = "__graphic_auto_";

/// Outcome of identity resolution for one declared element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub id: String,
    /// Lookup key into the order tracker's position map. `None` for synthetic ids.
    pub order_key: Option<String>,
    /// Set when neither an explicit id nor a positional key was available.
    pub missing_identity: bool,
}

/// Derives a stable id for a declared element.
///
/// Explicit ids win over positional keys. Without either, the id is built from
/// `fallback_seq` and is only stable for the lifetime of one element instance,
/// so list reordering of such elements is not tracked.
#[must_use]
pub fn resolve(
    explicit_id: Option<&IdentityValue>,
    positional_key: Option<&IdentityValue>,
    fallback_seq: u64,
) -> ResolvedIdentity {
    if let Some(explicit) = explicit_id {
        let id = explicit.to_string();
        return ResolvedIdentity {
            order_key: Some(explicit_order_key(&id)),
            id,
            missing_identity: false,
        };
    }

    if let Some(key) = positional_key {
        let id = key.to_string();
        return ResolvedIdentity {
            order_key: Some(positional_order_key(&id)),
            id,
            missing_identity: false,
        };
    }

    ResolvedIdentity {
        id: format!("{SYNTHETIC_ID_PREFIX}{fallback_seq}"),
        order_key: None,
        missing_identity: true,
    }
}

#[must_use]
pub fn explicit_order_key(id: &str) -> String {
    format!("id:{id}")
}

#[must_use]
pub fn positional_order_key(key: &str) -> String {
    format!("key:{key}")
}

/// Order key for a descriptor, following the same precedence as `resolve`.
#[must_use]
pub fn order_key_for(
    explicit_id: Option<&IdentityValue>,
    positional_key: Option<&IdentityValue>,
) -> Option<String> {
    explicit_id
        .map(|id| explicit_order_key(&id.to_string()))
        .or_else(|| positional_key.map(|key| positional_order_key(&key.to_string())))
}
