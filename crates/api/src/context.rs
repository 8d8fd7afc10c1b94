use lendbook_core::Identity;

/// Acting identity for a request.
///
/// This is immutable and must be present for all domain routes. The identity
/// itself comes from the external session provider; this process never
/// authenticates, it only transports the opaque string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    identity: Identity,
}

impl IdentityContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
