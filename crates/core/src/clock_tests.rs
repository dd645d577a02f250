// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_is_not_before_epoch() {
    let clock = SystemClock;
    assert!(clock.now() > DateTime::<Utc>::UNIX_EPOCH);
}

#[test]
fn fake_clock_starts_frozen() {
    let clock = FakeClock::new();
    assert_eq!(clock.now(), clock.now());
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert_eq!((t2 - t1).num_seconds(), 30);
}
