//! Activation of an entity when the player overlaps it

use super::EntityKind;
use crate::events::{GameEvent, Outbox};
use crate::foundation::collections::InstanceHandle;
use crate::pool::{InstanceState, ObjectPool};

/// Activate the entity behind `handle`
///
/// Pushes the domain event for the entity's kind followed by the request to
/// return it to its pool. Instances that are not active (already returned,
/// or never acquired) are ignored, so a repeated overlap cannot count twice.
/// Returns whether anything was emitted.
pub fn activate(pool: &ObjectPool, handle: InstanceHandle, outbox: &mut Outbox) -> bool {
    let Some(instance) = pool.instance(handle) else {
        log::warn!("Activation for unknown instance {handle:?}");
        return false;
    };
    if instance.state != InstanceState::Active {
        log::debug!("Ignoring activation of idle instance {handle:?}");
        return false;
    }
    if outbox
        .events()
        .iter()
        .any(|event| *event == GameEvent::ObjectReturnToPool(handle))
    {
        log::debug!("Instance {handle:?} already activated this frame");
        return false;
    }
    let Some(prototype) = pool.prototype(instance.prototype) else {
        log::warn!("Instance {handle:?} has no registered prototype");
        return false;
    };

    let domain_event = match &prototype.kind {
        EntityKind::Coin { value } => GameEvent::CoinCollected(*value),
        EntityKind::Obstacle => GameEvent::PlayerHitObstacle,
        EntityKind::PowerUp(data) => GameEvent::PowerupPicked(data.clone()),
    };
    outbox.push(domain_event);
    outbox.push(GameEvent::ObjectReturnToPool(handle));
    true
}
