//! Integration tests for hooks, monitors and active/idle tracking.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use astrid_bus::{Bus, BusError, HookKind, Payload, PROXY_KEY, WILDCARD_KEY};
use common::{BAR, Counter, FOO, record_hooks, strict_bus};

#[test]
fn test_active_and_idle_fire_once_per_transition() {
    let bus = Bus::new();
    let active = Counter::new();
    let idle = Counter::new();
    let on_active = active.bump();
    let on_idle = idle.bump();
    bus.hook(HookKind::Active, move |_| on_active());
    bus.hook(HookKind::Idle, move |_| on_idle());

    let subs = vec![
        bus.on(&FOO, |_: &u32| {}).unwrap(),
        bus.on(&BAR, |_: &u32| {}).unwrap(),
        bus.every(|| {}),
        bus.on_wildcard(|| {}),
        bus.proxy(|_, _| {}),
    ];
    assert_eq!((active.get(), idle.get()), (1, 0));

    for sub in &subs {
        sub.unsubscribe();
    }
    assert_eq!((active.get(), idle.get()), (1, 1));

    bus.on(&FOO, |_: &u32| {}).unwrap();
    assert_eq!((active.get(), idle.get()), (2, 1));
}

#[test]
fn test_delegate_hooks_bubble_to_every_ancestor() {
    let a = Bus::new();
    let b = Bus::new();
    let c = Bus::new();
    a.pipe(&b).unwrap();
    b.pipe(&c).unwrap();
    let seen_a = record_hooks(&a);
    let seen_b = record_hooks(&b);

    c.on(&FOO, |_: &u32| {}).unwrap();

    let expected = vec![
        (HookKind::WillAddListener, c.id()),
        (HookKind::DidAddListener, c.id()),
        (HookKind::WillActivate, c.id()),
        (HookKind::Active, c.id()),
    ];
    assert_eq!(*seen_a.lock().unwrap(), expected);
    assert_eq!(*seen_b.lock().unwrap(), expected);
}

#[test]
fn test_delegate_listeners_do_not_activate_parent() {
    let parent = Bus::new();
    let delegate = Bus::new();
    parent.pipe(&delegate).unwrap();
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&transitions);
    parent.monitor(move |active| sink.lock().unwrap().push(active));

    let sub = delegate.on(&FOO, |_: &u32| {}).unwrap();
    assert!(delegate.is_active());
    assert!(!parent.is_active());
    sub.unsubscribe();

    let own = parent.on(&FOO, |_: &u32| {}).unwrap();
    own.unsubscribe();

    assert_eq!(*transitions.lock().unwrap(), vec![true, false]);
}

#[test]
fn test_unpipe_stops_hook_bubbling() {
    let parent = Bus::new();
    let delegate = Bus::new();
    parent.pipe(&delegate).unwrap();
    let seen = record_hooks(&parent);

    parent.unpipe(&delegate);
    delegate.on(&FOO, |_: &u32| {}).unwrap();

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_destroy_clears_hooks_after_reporting_removal() {
    let bus = Bus::new();
    bus.on(&FOO, |_: &u32| {}).unwrap();
    bus.on(&BAR, |_: &u32| {}).unwrap();
    let seen = record_hooks(&bus);

    bus.destroy();
    let kinds: Vec<HookKind> = seen.lock().unwrap().iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            HookKind::WillRemoveListener,
            HookKind::DidRemoveListener,
            HookKind::WillRemoveListener,
            HookKind::DidRemoveListener,
            HookKind::WillIdle,
            HookKind::Idle,
        ]
    );

    bus.on(&FOO, |_: &u32| {}).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 6);
    assert!(bus.is_active());
}

#[test]
fn test_destroy_detaches_from_delegate_hooks() {
    let parent = Bus::new();
    let delegate = Bus::new();
    parent.pipe(&delegate).unwrap();

    parent.destroy();
    let seen = record_hooks(&parent);
    delegate.on(&FOO, |_: &u32| {}).unwrap();

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_subscription_after_destroy_is_noop() {
    let bus = Bus::new();
    let sub = bus.on(&FOO, |_: &u32| {}).unwrap();
    let hook = bus.hook(HookKind::Idle, |_| {});
    bus.destroy();

    let seen = record_hooks(&bus);
    sub.unsubscribe();
    hook.unsubscribe();
    sub.unsubscribe();

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_subscription_outliving_bus_is_noop() {
    let bus = Bus::new();
    let sub = bus.on(&FOO, |_: &u32| {}).unwrap();
    drop(bus);
    sub.unsubscribe();
    assert!(!sub.is_active());
}

#[test]
fn test_has_listeners_tracks_every_subscription_kind() {
    let bus = Bus::new();
    assert!(!bus.has_listeners());

    let typed = bus.on(&FOO, |_: &u32| {}).unwrap();
    let keyed = bus.on_key("raw", |_| {}).unwrap();
    let listed = bus.any(["foo", "bar"], |_, _| {}).unwrap();
    let proxy = bus.proxy(|_, _| {});

    for sub in [&typed, &keyed, &listed] {
        sub.unsubscribe();
        assert!(bus.has_listeners());
    }
    proxy.unsubscribe();
    assert!(!bus.has_listeners());
}

#[test]
fn test_reserved_keys_always_fail() {
    let (bus, policy) = strict_bus();
    bus.on_wildcard(|| {});
    bus.proxy(|_, _| {});

    for key in [WILDCARD_KEY, PROXY_KEY] {
        let err = bus.emit_payload(key, Payload::new(1_u32)).unwrap_err();
        assert_eq!(
            err,
            BusError::ReservedKey {
                key: key.to_string()
            }
        );
    }
    assert!(policy.unexpected().is_empty());
}

#[test]
fn test_willactivate_sees_active_state() {
    let bus = Bus::new();
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);
    let weak = bus.downgrade();
    bus.hook(HookKind::WillActivate, move |_| {
        if let Some(bus) = weak.upgrade() {
            *sink.lock().unwrap() = Some(bus.listener_count("foo"));
        }
    });

    bus.on(&FOO, |_: &u32| {}).unwrap();
    assert_eq!(*observed.lock().unwrap(), Some(1));
}

#[test]
fn test_will_idle_listener_can_keep_bus_active() {
    let bus = Bus::new();
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&transitions);
    bus.monitor(move |active| sink.lock().unwrap().push(active));
    let idle = Counter::new();
    let on_idle = idle.bump();
    bus.hook(HookKind::Idle, move |_| on_idle());

    let resubscribed = AtomicBool::new(false);
    let weak = bus.downgrade();
    bus.hook(HookKind::WillIdle, move |_| {
        if resubscribed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(bus) = weak.upgrade() {
            bus.on(&FOO, |_: &u32| {}).unwrap();
        }
    });

    let sub = bus.on(&FOO, |_: &u32| {}).unwrap();
    sub.unsubscribe();

    assert_eq!(*transitions.lock().unwrap(), vec![true]);
    assert_eq!(idle.get(), 0);
    assert!(bus.is_active());
    assert_eq!(bus.listener_count("foo"), 1);
}

#[test]
fn test_will_activate_listener_can_cancel_activation() {
    let bus = Bus::new();
    let active = Counter::new();
    let on_active = active.bump();
    bus.hook(HookKind::Active, move |_| on_active());
    let weak = bus.downgrade();
    bus.hook(HookKind::WillActivate, move |_| {
        if let Some(bus) = weak.upgrade() {
            bus.emit(&FOO, 1).unwrap();
        }
    });

    let fired = Counter::new();
    bus.once(&FOO, fired.bump_on()).unwrap();

    assert_eq!(fired.get(), 1);
    assert_eq!(active.get(), 0);
    assert!(!bus.is_active());
    assert!(!bus.has_listeners());
}

#[test]
fn test_activity_settles_across_threads() {
    let bus = Bus::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let bus = bus.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    bus.on(&FOO, |_: &u32| {}).unwrap().unsubscribe();
                }
            });
        }
    });
    assert!(!bus.is_active());
    assert!(!bus.has_listeners());

    bus.on(&FOO, |_: &u32| {}).unwrap();
    assert!(bus.is_active());
}

#[test]
fn test_destroyed_delegate_still_bubbles_hooks() {
    let parent = Bus::new();
    let child = Bus::new();
    parent.pipe(&child).unwrap();
    child.hook(HookKind::Active, |_| {});
    child.destroy();

    let seen = record_hooks(&parent);
    let received = Counter::new();
    child.on(&FOO, received.bump_on()).unwrap();
    parent.emit(&FOO, 1).unwrap();

    assert_eq!(received.get(), 1);
    assert_eq!(parent.delegate_count(), 1);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (HookKind::WillAddListener, child.id()),
            (HookKind::DidAddListener, child.id()),
            (HookKind::WillActivate, child.id()),
            (HookKind::Active, child.id()),
        ]
    );
}

#[test]
fn test_subscription_activity_follows_the_bus() {
    let bus = Bus::new();
    let once = bus.once(&FOO, |_: &u32| {}).unwrap();
    let keyed = bus.on(&BAR, |_: &u32| {}).unwrap();
    let hook = bus.hook(HookKind::Idle, |_| {});
    assert!(once.is_active());
    assert!(keyed.is_active());
    assert!(hook.is_active());

    bus.emit(&FOO, 1).unwrap();
    assert!(!once.is_active());
    assert!(keyed.is_active());

    bus.destroy();
    assert!(!keyed.is_active());
    assert!(!hook.is_active());
}
