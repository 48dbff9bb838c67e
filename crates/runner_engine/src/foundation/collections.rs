//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable handle to a pooled instance
    ///
    /// Handles stay valid for the lifetime of the pool; instances are recycled,
    /// never destroyed, so a handle always names the same instance.
    pub struct InstanceHandle;

    /// Identifies one registration in the event bus
    pub struct SubscriptionId;
}
