//! Prototype and instance records

use crate::entities::EntityKind;
use crate::foundation::math::Vec2;

/// Identity of a registered prototype
///
/// Minted only by [`ObjectPool::register_prototype`](super::ObjectPool::register_prototype);
/// two prototypes with identical content still get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrototypeId(pub(crate) u32);

impl PrototypeId {
    /// Registration index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable template for a recyclable entity
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    /// Name used in logs and config
    pub name: String,
    /// Behaviour shared by all instances
    pub kind: EntityKind,
}

impl Prototype {
    /// Create a prototype
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Where an instance currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Parked in its pool's idle queue, not in the world
    Idle,
    /// Placed in the world and interactive
    Active,
}

/// One pooled entity
#[derive(Debug, Clone, PartialEq)]
pub struct PooledInstance {
    /// Owning prototype, fixed for the instance's whole life
    pub prototype: PrototypeId,
    /// World position, meaningful while active
    pub position: Vec2,
    /// Idle or active
    pub state: InstanceState,
}
