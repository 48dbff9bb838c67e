//! Per-prototype recycling allocator

use super::prototype::{InstanceState, PooledInstance, Prototype, PrototypeId};
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox};
use crate::foundation::collections::{InstanceHandle, SlotMap};
use crate::foundation::math::Vec2;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default)]
struct Pool {
    idle: VecDeque<InstanceHandle>,
    active: Vec<InstanceHandle>,
    constructed: usize,
}

/// Statistics for the object pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful acquisitions since creation
    pub total_acquired: u64,
    /// Successful releases since creation
    pub total_released: u64,
    /// Acquisitions that had to construct a new instance
    pub lazy_constructions: u64,
    /// Releases ignored because the instance was not active
    pub rejected_releases: u64,
}

/// Recycling allocator for spawned entities
///
/// One pool per prototype: a FIFO queue of idle instances plus the set of
/// active ones. Pools grow on demand and never shrink.
pub struct ObjectPool {
    prototypes: Vec<Prototype>,
    pools: HashMap<PrototypeId, Pool>,
    instances: SlotMap<InstanceHandle, PooledInstance>,
    stats: PoolStats,
}

impl ObjectPool {
    /// Create an empty object pool
    pub fn new() -> Self {
        Self {
            prototypes: Vec::new(),
            pools: HashMap::new(),
            instances: SlotMap::with_key(),
            stats: PoolStats::default(),
        }
    }

    /// Register a prototype and create its (empty) pool
    pub fn register_prototype(&mut self, prototype: Prototype) -> PrototypeId {
        let id = PrototypeId(u32::try_from(self.prototypes.len()).unwrap_or(u32::MAX));
        log::debug!("Registered prototype '{}' as {id:?}", prototype.name);
        self.prototypes.push(prototype);
        self.pools.entry(id).or_default();
        id
    }

    /// Pre-populate `count` idle instances for a prototype
    pub fn initialize_pool(&mut self, prototype: PrototypeId, count: usize) {
        for _ in 0..count {
            let handle = self.construct(prototype);
            self.pool_mut(prototype).idle.push_back(handle);
        }
        log::info!(
            "Initialized pool for '{}' with {} idle instances",
            self.prototype_name(prototype),
            count
        );
    }

    /// Take an instance of `prototype` and place it at `position`
    ///
    /// Reuses the oldest idle instance, or constructs a new one when the
    /// idle queue is empty. Never fails.
    pub fn acquire(&mut self, prototype: PrototypeId, position: Vec2) -> InstanceHandle {
        if !self.pools.contains_key(&prototype) {
            log::warn!("No pool for prototype {prototype:?}, initializing one");
        }

        let handle = match self.pool_mut(prototype).idle.pop_front() {
            Some(handle) => handle,
            None => {
                self.stats.lazy_constructions += 1;
                self.construct(prototype)
            }
        };

        if let Some(instance) = self.instances.get_mut(handle) {
            instance.state = InstanceState::Active;
            instance.position = position;
        }
        self.pool_mut(prototype).active.push(handle);
        self.stats.total_acquired += 1;
        handle
    }

    /// Return an active instance to the tail of its pool's idle queue
    ///
    /// Releasing an idle or unknown instance is logged and ignored.
    pub fn release(&mut self, handle: InstanceHandle) -> bool {
        let Some(instance) = self.instances.get_mut(handle) else {
            log::warn!("Returned object {handle:?} is not tracked by the pool");
            self.stats.rejected_releases += 1;
            return false;
        };
        if instance.state != InstanceState::Active {
            log::warn!("Returned object {handle:?} is already idle");
            self.stats.rejected_releases += 1;
            return false;
        }

        instance.state = InstanceState::Idle;
        let prototype = instance.prototype;
        let pool = self.pool_mut(prototype);
        if let Some(index) = pool.active.iter().position(|active| *active == handle) {
            pool.active.remove(index);
        }
        pool.idle.push_back(handle);
        self.stats.total_released += 1;
        true
    }

    /// Force every active instance of every prototype back to idle
    pub fn reset_all(&mut self) {
        let mut returned = 0;
        for pool in self.pools.values_mut() {
            for handle in pool.active.drain(..).rev() {
                if let Some(instance) = self.instances.get_mut(handle) {
                    instance.state = InstanceState::Idle;
                }
                pool.idle.push_back(handle);
                returned += 1;
            }
        }
        self.stats.total_released += returned;
        log::info!("Pool reset returned {returned} active instances");
    }

    /// Move every active instance left by `distance`; release those past `despawn_x`
    ///
    /// Returns how many instances were released.
    pub fn scroll_active(&mut self, distance: f32, despawn_x: f32) -> usize {
        let mut expired = Vec::new();
        for pool in self.pools.values() {
            for handle in &pool.active {
                if let Some(instance) = self.instances.get_mut(*handle) {
                    instance.position.x -= distance;
                    if instance.position.x < despawn_x {
                        expired.push(*handle);
                    }
                }
            }
        }
        expired.into_iter().filter(|handle| self.release(*handle)).count()
    }

    /// Look up an instance
    pub fn instance(&self, handle: InstanceHandle) -> Option<&PooledInstance> {
        self.instances.get(handle)
    }

    /// Look up a registered prototype
    pub fn prototype(&self, id: PrototypeId) -> Option<&Prototype> {
        self.prototypes.get(id.index())
    }

    /// Registered prototype ids in registration order
    pub fn prototype_ids(&self) -> impl Iterator<Item = PrototypeId> + '_ {
        (0..self.prototypes.len()).filter_map(|index| u32::try_from(index).ok().map(PrototypeId))
    }

    /// Find a prototype by its configured name
    pub fn find_prototype(&self, name: &str) -> Option<PrototypeId> {
        self.prototype_ids()
            .find(|id| self.prototypes[id.index()].name == name)
    }

    /// Idle instances waiting in a prototype's pool
    pub fn idle_count(&self, prototype: PrototypeId) -> usize {
        self.pools.get(&prototype).map_or(0, |pool| pool.idle.len())
    }

    /// Active instances of a prototype
    pub fn active_count(&self, prototype: PrototypeId) -> usize {
        self.pools.get(&prototype).map_or(0, |pool| pool.active.len())
    }

    /// Instances ever constructed for a prototype
    pub fn total_constructed(&self, prototype: PrototypeId) -> usize {
        self.pools.get(&prototype).map_or(0, |pool| pool.constructed)
    }

    /// Active instances across every prototype
    pub fn total_active(&self) -> usize {
        self.pools.values().map(|pool| pool.active.len()).sum()
    }

    /// Handles of every active instance
    pub fn active_instances(&self) -> impl Iterator<Item = (InstanceHandle, &PooledInstance)> + '_ {
        self.pools
            .values()
            .flat_map(|pool| pool.active.iter())
            .filter_map(|handle| self.instances.get(*handle).map(|instance| (*handle, instance)))
    }

    /// Lifetime counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn construct(&mut self, prototype: PrototypeId) -> InstanceHandle {
        let handle = self.instances.insert(PooledInstance {
            prototype,
            position: Vec2::zeros(),
            state: InstanceState::Idle,
        });
        self.pool_mut(prototype).constructed += 1;
        handle
    }

    fn pool_mut(&mut self, prototype: PrototypeId) -> &mut Pool {
        self.pools.entry(prototype).or_default()
    }

    fn prototype_name(&self, prototype: PrototypeId) -> &str {
        self.prototype(prototype).map_or("<unregistered>", |p| p.name.as_str())
    }
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ObjectPool {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::ObjectReturnToPool(handle) => {
                self.release(*handle);
            }
            GameEvent::GameRestart => self.reset_all(),
            _ => {}
        }
        Ok(())
    }
}
