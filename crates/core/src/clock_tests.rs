use super::*;

#[test]
fn fake_clock_advances_monotonic_and_wall_time_together() {
    let clock = FakeClock::new(1_700_000_000_000);
    let t0 = clock.now_instant();
    let e0 = clock.epoch_ms();

    clock.advance_ms(5_000);

    let t1 = clock.now_instant();
    let e1 = clock.epoch_ms();

    assert_eq!(t1.duration_since(t0).as_millis(), 5_000);
    assert_eq!(e1 - e0, 5_000);
}

#[test]
fn fake_clock_is_cheaply_cloneable_and_shares_state() {
    let clock = FakeClock::new(0);
    let clone = clock.clone();
    clock.advance_ms(1_000);
    assert_eq!(clone.epoch_ms(), 1_000);
}

#[test]
fn system_clock_reports_plausible_wall_time() {
    let clock = SystemClock;
    let now = clock.now_utc();
    assert!(now.timestamp() > 1_700_000_000);
}
