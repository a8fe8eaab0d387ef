//! End-to-end behavior of the public fuse container API
//!
//! Drives a container with a manual clock through the scenarios a driving
//! loop produces: many fuses armed together, repeated polling, teardown.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use fusebox_core::{FuseContainer, FuseError, ManualClock, PollStatus};

type Log = Rc<RefCell<Vec<String>>>;

fn sample_container(clock: &ManualClock, log: &Log) -> FuseContainer<String, ManualClock> {
    let mut fuses = FuseContainer::with_clock(clock.clone());
    for (text, secs) in [
        ("Ten (10) second delay", 10),
        ("Five (5) second delay", 5),
        ("One (1) second delay", 1),
        ("Twelve (12) second delay", 12),
        ("Six (6) second delay", 6),
        ("Eight (8) second delay", 8),
    ] {
        let log = Rc::clone(log);
        fuses
            .add_secs(text.to_string(), secs, move |msg| log.borrow_mut().push(msg))
            .unwrap();
    }
    fuses
}

#[test]
fn sample_fuses_fire_once_each_across_scans() {
    let clock = ManualClock::new();
    let log: Log = Rc::default();
    let mut fuses = sample_container(&clock, &log);
    assert_eq!(fuses.len(), 6);

    clock.advance_secs(11);
    assert_eq!(fuses.poll_all(), 5);
    assert_eq!(fuses.len(), 1);
    let mut fired = log.borrow().clone();
    fired.sort();
    assert_eq!(
        fired,
        vec![
            "Eight (8) second delay",
            "Five (5) second delay",
            "One (1) second delay",
            "Six (6) second delay",
            "Ten (10) second delay",
        ]
    );
    assert_eq!(*fuses.get_at(0).unwrap().payload(), "Twelve (12) second delay");

    // No time passes: the survivor stays armed
    assert_eq!(fuses.poll_all(), 0);
    assert_eq!(fuses.len(), 1);

    clock.advance_secs(3);
    assert_eq!(fuses.poll_all(), 1);
    assert!(fuses.is_empty());
    assert_eq!(log.borrow().len(), 6);

    // Polling an empty container forever fires nothing more
    clock.advance_secs(100);
    assert_eq!(fuses.poll_all(), 0);
    assert_eq!(log.borrow().len(), 6);
}

#[test]
fn driving_loop_terminates_when_count_reaches_zero() {
    let clock = ManualClock::new();
    let log: Log = Rc::default();
    let mut fuses = sample_container(&clock, &log);

    let mut ticks = 0;
    while !fuses.is_empty() {
        fuses.poll_all();
        clock.advance(Duration::from_millis(250));
        ticks += 1;
        assert!(ticks < 1000, "driving loop did not drain the container");
    }

    let order: Vec<_> = log.borrow().clone();
    assert_eq!(order.first().map(String::as_str), Some("One (1) second delay"));
    assert_eq!(order.last().map(String::as_str), Some("Twelve (12) second delay"));
    assert_eq!(order.len(), 6);

    let mut handle = Some(fuses);
    FuseContainer::close_handle(&mut handle);
    FuseContainer::close_handle(&mut handle);
}

#[test]
fn no_premature_fire() {
    let clock = ManualClock::new();
    let log: Log = Rc::default();
    let mut fuses = FuseContainer::with_clock(clock.clone());
    let sink = Rc::clone(&log);
    let id = fuses
        .add(String::from("late"), Duration::from_secs(30), move |m| {
            sink.borrow_mut().push(m)
        })
        .unwrap();

    for _ in 0..29 {
        clock.advance_secs(1);
        fuses.poll_all();
        assert!(matches!(fuses.poll(id), Ok(PollStatus::Pending { .. })));
    }
    assert!(log.borrow().is_empty());
    assert_eq!(fuses.get(id).unwrap().duration(), Duration::from_secs(30));

    clock.advance_secs(1);
    assert_eq!(fuses.poll(id).unwrap(), PollStatus::Fired);
    assert_eq!(*log.borrow(), vec!["late"]);
}

#[test]
fn removal_and_clear_are_silent() {
    let clock = ManualClock::new();
    let log: Log = Rc::default();
    let mut fuses = sample_container(&clock, &log);

    let twelve = fuses.get_at(3).unwrap().id();
    assert_eq!(fuses.remove(twelve).unwrap(), "Twelve (12) second delay");
    assert!(matches!(
        fuses.remove(twelve),
        Err(FuseError::NotFound { .. })
    ));

    fuses.clear();
    assert!(fuses.is_empty());

    clock.advance_secs(60);
    assert_eq!(fuses.poll_all(), 0);
    assert!(log.borrow().is_empty());

    fuses.close();
}
