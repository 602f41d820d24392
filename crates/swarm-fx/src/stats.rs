#![forbid(unsafe_code)]

//! Count-up figures for the about section.

use std::time::Duration;

use swarm_core::animation::{Animation, CountUp};

/// A labelled figure that counts up from zero while in view.
#[derive(Debug, Clone)]
pub struct StatCounter {
    label: &'static str,
    suffix: &'static str,
    counter: CountUp,
}

impl StatCounter {
    pub fn new(label: &'static str, target: u32, suffix: &'static str) -> Self {
        Self {
            label,
            suffix,
            counter: CountUp::new(target),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn target(&self) -> u32 {
        self.counter.target()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.counter.set_visible(visible);
    }

    pub fn tick(&mut self, dt: Duration) {
        self.counter.tick(dt);
    }

    pub fn is_complete(&self) -> bool {
        self.counter.is_complete()
    }

    /// Text as shown on the page, e.g. `"98%"`.
    pub fn text(&self) -> String {
        format!("{}{}", self.counter.display(), self.suffix)
    }
}

/// The four figures shown under "About Us".
pub fn about_stats() -> Vec<StatCounter> {
    vec![
        StatCounter::new("Projects Delivered", 50, "+"),
        StatCounter::new("Client Satisfaction", 98, "%"),
        StatCounter::new("Models Deployed", 120, "+"),
        StatCounter::new("Team Members", 15, "+"),
    ]
}
