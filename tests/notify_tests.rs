mod common;

use common::{FakeApi, at, clock_with, idle_record, new_clock};
use rworkclock::core::notify::StatusBus;
use rworkclock::core::ticker::ManualScheduler;
use rworkclock::models::status::WorkStatus;
use rworkclock::store::MemoryStore;
use std::cell::RefCell;
use std::rc::Rc;

fn recorder(bus: &StatusBus) -> Rc<RefCell<Vec<WorkStatus>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(move |s| sink.borrow_mut().push(*s));
    seen
}

#[test]
fn test_clock_publishes_state_changes() {
    let (mut clock, _) = new_clock();
    let seen = recorder(clock.bus());
    let mut api = FakeApi::new();
    api.next_check_out_total(7300);

    clock.initialize(Some(idle_record(7200)), at(0)).unwrap();
    clock.check_in(&mut api, at(0)).unwrap();
    // ticks do not publish
    clock.tick(at(50));
    clock.tick(at(60));
    clock.check_out(&mut api, at(100)).unwrap();

    let seen = seen.borrow();
    assert_eq!(
        *seen,
        vec![
            WorkStatus { total_seconds: 7200, is_active: false },
            WorkStatus { total_seconds: 7200, is_active: true },
            // frozen at check-out
            WorkStatus { total_seconds: 7300, is_active: true },
            WorkStatus { total_seconds: 7300, is_active: false },
        ]
    );
}

#[test]
fn test_rollback_is_published() {
    let bus = StatusBus::new();
    let seen = recorder(&bus);
    let mut clock = clock_with(MemoryStore::new(), ManualScheduler::new()).with_bus(bus.clone());
    let mut api = FakeApi::new();
    api.fail_next_check_in();

    clock.initialize(Some(idle_record(30)), at(0)).unwrap();
    assert!(clock.check_in(&mut api, at(1)).is_err());

    let last = seen.borrow().last().copied().unwrap();
    assert_eq!(last, WorkStatus { total_seconds: 30, is_active: false });
    assert_eq!(bus.last(), Some(last));
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn test_subscribers_called_in_order_and_unsubscribe() {
    let bus = StatusBus::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let o1 = Rc::clone(&order);
    let first = bus.subscribe(move |_| o1.borrow_mut().push("first"));
    let o2 = Rc::clone(&order);
    bus.subscribe(move |_| o2.borrow_mut().push("second"));
    assert_eq!(bus.subscriber_count(), 2);

    let status = WorkStatus { total_seconds: 1, is_active: true };
    bus.publish(status);
    assert_eq!(*order.borrow(), vec!["first", "second"]);

    assert!(bus.unsubscribe(first));
    assert!(!bus.unsubscribe(first));
    bus.publish(status);
    assert_eq!(*order.borrow(), vec!["first", "second", "second"]);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn test_unsubscribe_from_inside_a_callback() {
    let bus = StatusBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    // the first subscriber removes the second during the same publish
    let victim = Rc::new(RefCell::new(None));
    let bus_handle = bus.clone();
    let victim_handle = Rc::clone(&victim);
    let c1 = Rc::clone(&calls);
    bus.subscribe(move |_| {
        c1.borrow_mut().push("killer");
        if let Some(id) = victim_handle.borrow_mut().take() {
            bus_handle.unsubscribe(id);
        }
    });
    let c2 = Rc::clone(&calls);
    let id = bus.subscribe(move |_| c2.borrow_mut().push("victim"));
    *victim.borrow_mut() = Some(id);

    bus.publish(WorkStatus { total_seconds: 0, is_active: false });
    bus.publish(WorkStatus { total_seconds: 0, is_active: false });

    assert_eq!(*calls.borrow(), vec!["killer", "killer"]);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn test_subscribe_from_inside_a_callback() {
    let bus = StatusBus::new();
    let calls = Rc::new(RefCell::new(0));

    let bus_handle = bus.clone();
    let counter = Rc::clone(&calls);
    let added = Rc::new(RefCell::new(false));
    bus.subscribe(move |_| {
        if !*added.borrow() {
            *added.borrow_mut() = true;
            let inner = Rc::clone(&counter);
            bus_handle.subscribe(move |_| *inner.borrow_mut() += 1);
        }
    });

    bus.publish(WorkStatus { total_seconds: 5, is_active: true });
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(bus.subscriber_count(), 2);

    bus.publish(WorkStatus { total_seconds: 6, is_active: true });
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_unsubscribe_survives_a_nested_publish() {
    let bus = StatusBus::new();
    let removed_calls = Rc::new(RefCell::new(0));
    let first_calls = Rc::new(RefCell::new(0));

    // the first subscriber removes the second, then publishes again
    let target = Rc::new(RefCell::new(None));
    let bus_handle = bus.clone();
    let target_handle = Rc::clone(&target);
    let counter = Rc::clone(&first_calls);
    bus.subscribe(move |status| {
        *counter.borrow_mut() += 1;
        if let Some(id) = target_handle.borrow_mut().take() {
            bus_handle.unsubscribe(id);
        }
        if status.is_active {
            bus_handle.publish(WorkStatus {
                total_seconds: status.total_seconds,
                is_active: false,
            });
        }
    });
    let counter = Rc::clone(&removed_calls);
    let id = bus.subscribe(move |_| *counter.borrow_mut() += 1);
    *target.borrow_mut() = Some(id);

    bus.publish(WorkStatus { total_seconds: 10, is_active: true });
    bus.publish(WorkStatus { total_seconds: 20, is_active: true });

    assert_eq!(*removed_calls.borrow(), 0);
    assert_eq!(bus.subscriber_count(), 1);
    // nested publishes skip the subscriber that is still running
    assert_eq!(*first_calls.borrow(), 2);
    assert_eq!(
        bus.last(),
        Some(WorkStatus { total_seconds: 20, is_active: false })
    );
}

#[test]
fn test_nested_publish_reaches_other_subscribers() {
    let bus = StatusBus::new();
    let seen = recorder(&bus);

    let bus_handle = bus.clone();
    bus.subscribe(move |status| {
        if status.total_seconds == 1 {
            bus_handle.publish(WorkStatus { total_seconds: 2, is_active: false });
        }
    });

    bus.publish(WorkStatus { total_seconds: 1, is_active: true });

    let totals: Vec<u64> = seen.borrow().iter().map(|s| s.total_seconds).collect();
    assert_eq!(totals, vec![1, 2]);
    assert_eq!(bus.subscriber_count(), 2);
}
