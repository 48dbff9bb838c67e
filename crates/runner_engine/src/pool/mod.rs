//! Object pooling
//!
//! Recycles coins, obstacles and power-ups instead of reallocating them.
//!
//! # Architecture
//!
//! ```text
//! ObjectPool
//!     ├── prototypes  (PrototypeId → Prototype)
//!     ├── pools       (PrototypeId → idle FIFO + active set)
//!     └── instances   (InstanceHandle → PooledInstance, tagged with its PrototypeId)
//! ```
//!
//! Every instance records the prototype it was built from, so returning it
//! to its pool is O(1) and an instance can never migrate to another pool.

mod object_pool;
mod prototype;

pub use object_pool::{ObjectPool, PoolStats};
pub use prototype::{InstanceState, PooledInstance, Prototype, PrototypeId};
