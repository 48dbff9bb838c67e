//! Event bus with registration and isolated dispatch

use super::{EventKind, GameEvent};
use crate::foundation::collections::{SlotMap, SubscriptionId};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Upper bound on events dispatched by a single `publish` call, follow-ups included
const MAX_DISPATCH_PER_PUBLISH: usize = 1024;

/// Error a handler reports back to the bus
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    /// The handler could not process the event
    #[error("handler rejected {kind:?}: {reason}")]
    Rejected {
        /// Kind of the event that was rejected
        kind: EventKind,
        /// Why
        reason: String,
    },
}

/// Result returned by every handler invocation
pub type HandlerResult = Result<(), HandlerError>;

/// Events produced while handling or ticking, dispatched after the current event
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<GameEvent>,
}

impl Outbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for publication
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queued events in push order
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Discard every queued event
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Take every queued event, leaving the outbox empty
    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}

/// Event handler trait
///
/// Handlers never see the bus itself; anything they want to announce goes
/// into the outbox and is delivered within the same `publish` call.
pub trait EventHandler {
    /// Handle an event
    fn on_event(&mut self, event: &GameEvent, outbox: &mut Outbox) -> HandlerResult;
}

impl<F> EventHandler for F
where
    F: FnMut(&GameEvent, &mut Outbox) -> HandlerResult,
{
    fn on_event(&mut self, event: &GameEvent, outbox: &mut Outbox) -> HandlerResult {
        self(event, outbox)
    }
}

/// Handler shared between the bus and its owner
pub type SharedHandler = Rc<RefCell<dyn EventHandler>>;

struct Subscription {
    kind: EventKind,
    handler: SharedHandler,
}

/// Outcome of one `publish` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Events dispatched, the published one plus follow-ups
    pub dispatched: usize,
    /// Successful handler invocations
    pub delivered: usize,
    /// Handler invocations that returned an error or panicked
    pub faults: usize,
}

/// Process-wide event registry
///
/// The session constructs exactly one bus and hands it around explicitly;
/// there is no global accessor.
pub struct EventBus {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    by_kind: HashMap<EventKind, Vec<SubscriptionId>>,
}

impl EventBus {
    /// Create a new empty event bus
    pub fn new() -> Self {
        Self {
            subscriptions: SlotMap::with_key(),
            by_kind: HashMap::new(),
        }
    }

    /// Register a handler for an event kind
    ///
    /// Registering the same handler object for the same kind again returns the
    /// existing id instead of adding a second delivery.
    pub fn subscribe(&mut self, kind: EventKind, handler: SharedHandler) -> SubscriptionId {
        let ids = self.by_kind.entry(kind).or_default();
        if let Some(existing) = ids.iter().copied().find(|id| {
            self.subscriptions
                .get(*id)
                .is_some_and(|sub| same_handler(&sub.handler, &handler))
        }) {
            log::debug!("Handler already subscribed to {kind:?}");
            return existing;
        }

        let id = self.subscriptions.insert(Subscription { kind, handler });
        ids.push(id);
        id
    }

    /// Register one handler object for several kinds, in the given order
    pub fn subscribe_all(&mut self, kinds: &[EventKind], handler: &SharedHandler) -> Vec<SubscriptionId> {
        kinds
            .iter()
            .map(|kind| self.subscribe(*kind, Rc::clone(handler)))
            .collect()
    }

    /// Register a closure for an event kind
    pub fn subscribe_fn<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent, &mut Outbox) -> HandlerResult + 'static,
    {
        self.subscribe(kind, Rc::new(RefCell::new(handler)))
    }

    /// Remove a registration; returns `false` if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(subscription) = self.subscriptions.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_kind.get_mut(&subscription.kind) {
            ids.retain(|existing| *existing != id);
        }
        true
    }

    /// Number of handlers registered for a kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to every handler registered for its kind
    ///
    /// Handlers run in subscription order. Follow-up events pushed to the
    /// outbox are delivered after the current event has reached every
    /// handler, before this call returns.
    pub fn publish(&mut self, event: GameEvent) -> PublishReport {
        let mut report = PublishReport::default();
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            if report.dispatched >= MAX_DISPATCH_PER_PUBLISH {
                log::error!(
                    "Event cascade exceeded {MAX_DISPATCH_PER_PUBLISH} dispatches, dropping {} queued events",
                    queue.len() + 1
                );
                break;
            }
            report.dispatched += 1;

            let kind = event.kind();
            log::trace!("Dispatching {event:?}");
            for handler in self.handlers_for(kind) {
                let mut outbox = Outbox::new();
                if invoke(&handler, &event, &mut outbox) {
                    report.delivered += 1;
                } else {
                    report.faults += 1;
                }
                queue.extend(outbox.drain());
            }
        }

        report
    }

    /// Publish every event queued in an outbox, in order
    pub fn publish_all(&mut self, outbox: &mut Outbox) -> PublishReport {
        let events: Vec<GameEvent> = outbox.drain().collect();
        events.into_iter().fold(PublishReport::default(), |total, event| {
            let report = self.publish(event);
            PublishReport {
                dispatched: total.dispatched + report.dispatched,
                delivered: total.delivered + report.delivered,
                faults: total.faults + report.faults,
            }
        })
    }

    /// Snapshot so handlers registered during dispatch only see later events
    fn handlers_for(&self, kind: EventKind) -> Vec<SharedHandler> {
        self.by_kind
            .get(&kind)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.subscriptions.get(*id))
                    .map(|sub| Rc::clone(&sub.handler))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn same_handler(a: &SharedHandler, b: &SharedHandler) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// Run one handler, containing errors and panics; returns whether it succeeded
fn invoke(handler: &SharedHandler, event: &GameEvent, outbox: &mut Outbox) -> bool {
    let Ok(mut guard) = handler.try_borrow_mut() else {
        log::error!("Handler for {:?} is already borrowed, skipping", event.kind());
        return false;
    };

    match panic::catch_unwind(AssertUnwindSafe(|| guard.on_event(event, outbox))) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            log::error!("Event handler failed: {err}");
            false
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Event handler panicked on {:?}: {message}", event.kind());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(bus: &mut EventBus, kind: EventKind) -> Rc<RefCell<u32>> {
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        bus.subscribe_fn(kind, move |_, _| {
            *seen.borrow_mut() += 1;
            Ok(())
        });
        count
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let mut bus = EventBus::new();
        let report = bus.publish(GameEvent::GameStart);
        assert_eq!(report, PublishReport { dispatched: 1, delivered: 0, faults: 0 });
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.subscribe_fn(EventKind::CoinCollected, move |_, _| {
                order.borrow_mut().push(tag);
                Ok(())
            });
        }

        bus.publish(GameEvent::CoinCollected(1));
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_only_matching_kind_is_notified() {
        let mut bus = EventBus::new();
        let coins = counter(&mut bus, EventKind::CoinCollected);
        let hits = counter(&mut bus, EventKind::PlayerHitObstacle);

        bus.publish(GameEvent::CoinCollected(1));
        assert_eq!(*coins.borrow(), 1);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_failing_handler_does_not_block_siblings() {
        let mut bus = EventBus::new();
        bus.subscribe_fn(EventKind::GameOver, |event, _| {
            Err(HandlerError::Rejected { kind: event.kind(), reason: "broken".into() })
        });
        let after = counter(&mut bus, EventKind::GameOver);

        let report = bus.publish(GameEvent::GameOver);
        assert_eq!(*after.borrow(), 1);
        assert_eq!(report.faults, 1);
        assert_eq!(report.delivered, 1);
    }

    #[test]
    fn test_panicking_handler_does_not_block_siblings() {
        let mut bus = EventBus::new();
        bus.subscribe_fn(EventKind::GameOver, |_, _| panic!("subscriber blew up"));
        let after = counter(&mut bus, EventKind::GameOver);

        let report = bus.publish(GameEvent::GameOver);
        assert_eq!(*after.borrow(), 1);
        assert_eq!(report.faults, 1);

        // The panicking handler is still registered and the bus keeps working
        bus.publish(GameEvent::GameOver);
        assert_eq!(*after.borrow(), 2);
    }

    #[test]
    fn test_subscribe_same_handler_twice_is_idempotent() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        let handler: SharedHandler = Rc::new(RefCell::new(move |_: &GameEvent, _: &mut Outbox| -> HandlerResult {
            *seen.borrow_mut() += 1;
            Ok(())
        }));

        let first = bus.subscribe(EventKind::GameStart, Rc::clone(&handler));
        let second = bus.subscribe(EventKind::GameStart, Rc::clone(&handler));
        assert_eq!(first, second);
        assert_eq!(bus.subscriber_count(EventKind::GameStart), 1);

        bus.publish(GameEvent::GameStart);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        let id = bus.subscribe_fn(EventKind::GameStart, move |_, _| {
            *seen.borrow_mut() += 1;
            Ok(())
        });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(GameEvent::GameStart);
        assert_eq!(*count.borrow(), 0);
        assert_eq!(bus.subscriber_count(EventKind::GameStart), 0);
    }

    #[test]
    fn test_follow_up_events_dispatch_after_current() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe_fn(EventKind::CoinCollected, |event, outbox| {
            if let GameEvent::CoinCollected(amount) = event {
                outbox.push(GameEvent::CoinScoreChanged(*amount));
            }
            Ok(())
        });
        let coin_log = Rc::clone(&log);
        bus.subscribe_fn(EventKind::CoinCollected, move |_, _| {
            coin_log.borrow_mut().push("collected");
            Ok(())
        });
        let score_log = Rc::clone(&log);
        bus.subscribe_fn(EventKind::CoinScoreChanged, move |_, _| {
            score_log.borrow_mut().push("score");
            Ok(())
        });

        let report = bus.publish(GameEvent::CoinCollected(5));
        assert_eq!(*log.borrow(), vec!["collected", "score"]);
        assert_eq!(report.dispatched, 2);
    }

    #[test]
    fn test_runaway_cascade_is_cut() {
        let mut bus = EventBus::new();
        bus.subscribe_fn(EventKind::GamePaused, |_, outbox| {
            outbox.push(GameEvent::GamePaused);
            Ok(())
        });

        let report = bus.publish(GameEvent::GamePaused);
        assert_eq!(report.dispatched, MAX_DISPATCH_PER_PUBLISH);
    }
}
