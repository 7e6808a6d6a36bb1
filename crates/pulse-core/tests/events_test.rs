use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pulse_core::events::*;

#[derive(Default)]
struct Counter {
    invalidations: AtomicUsize,
}

impl PatternEventHandler for Counter {
    fn on_cache_invalidated(&self, _event: &CacheInvalidatedEvent) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

struct Panicker;

impl PatternEventHandler for Panicker {
    fn on_cache_invalidated(&self, _event: &CacheInvalidatedEvent) {
        panic!("boom");
    }
}

fn invalidation() -> CacheInvalidatedEvent {
    CacheInvalidatedEvent {
        keys: vec!["pattern:a".into()],
        strategy: "immediate".into(),
    }
}

#[test]
fn empty_dispatcher_is_a_no_op() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_cache_invalidated(&invalidation());
}

#[test]
fn every_handler_receives_each_event_once() {
    let dispatcher = EventDispatcher::new();
    let a = Arc::new(Counter::default());
    let b = Arc::new(Counter::default());
    dispatcher.register(a.clone());
    dispatcher.register(b.clone());

    dispatcher.emit_cache_invalidated(&invalidation());

    assert_eq!(a.invalidations.load(Ordering::SeqCst), 1);
    assert_eq!(b.invalidations.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_handler_does_not_block_later_handlers() {
    let dispatcher = EventDispatcher::new();
    let counter = Arc::new(Counter::default());
    dispatcher.register(Arc::new(Panicker));
    dispatcher.register(counter.clone());

    dispatcher.emit_cache_invalidated(&invalidation());

    assert_eq!(counter.invalidations.load(Ordering::SeqCst), 1);
}

#[test]
fn unregistered_handler_stops_receiving() {
    let dispatcher = EventDispatcher::new();
    let counter = Arc::new(Counter::default());
    let id = dispatcher.register(counter.clone());

    assert!(dispatcher.unregister(id));
    assert!(!dispatcher.unregister(id));
    dispatcher.emit_cache_invalidated(&invalidation());

    assert_eq!(counter.invalidations.load(Ordering::SeqCst), 0);
}

#[test]
fn clear_detaches_everything() {
    let dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(Counter::default()));
    dispatcher.register(Arc::new(Counter::default()));
    dispatcher.clear();
    assert_eq!(dispatcher.handler_count(), 0);
}
