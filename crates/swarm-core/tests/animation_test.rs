//! Integration tests for easing and the count-up animation.

use std::time::Duration;
use swarm_core::animation::*;

#[test]
fn easing_functions_are_monotonic() {
    for easing in [linear, ease_out_cubic, smooth] {
        let mut prev = 0.0f32;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = easing(t);
            assert!(v >= prev - 0.001, "easing should be monotonic at t={}", t);
            prev = v;
        }
    }
}

#[test]
fn easing_functions_pin_endpoints() {
    for easing in [linear, ease_out_cubic, smooth] {
        assert_eq!(easing(0.0), 0.0);
        assert_eq!(easing(1.0), 1.0);
        assert_eq!(easing(-2.0), 0.0, "input below 0 must clamp");
        assert_eq!(easing(9.0), 1.0, "input above 1 must clamp");
    }
}

#[test]
fn count_up_frames_never_decrease() {
    let mut counter = CountUp::new(98);
    counter.set_visible(true);
    let mut last = 0;
    // ~60fps for 2.5s
    for _ in 0..150 {
        counter.tick(Duration::from_micros(16_667));
        let shown = counter.display();
        assert!(shown >= last, "counter went backwards: {last} -> {shown}");
        assert!(shown <= counter.target());
        last = shown;
    }
    assert_eq!(last, 98);
}

#[test]
fn count_up_with_custom_duration() {
    let mut counter = CountUp::with_duration(15, Duration::from_millis(100));
    counter.set_visible(true);
    counter.tick(Duration::from_millis(100));
    assert!(counter.is_complete());
    assert_eq!(counter.display(), 15);
}
