#![forbid(unsafe_code)]

//! Page pieces without particles: the per-section reveal and the about
//! counters. The browser classes wrap these; everything here is plain data.

use std::time::Duration;

use swarm_fx::scroll::{ContentKeyframes, scroll_progress};
use swarm_fx::stats::{StatCounter, about_stats};

/// Rise-in/rise-out transform for a whole section.
#[derive(Debug, Clone)]
pub struct SectionReveal {
    keyframes: ContentKeyframes,
}

impl Default for SectionReveal {
    fn default() -> Self {
        Self {
            keyframes: ContentKeyframes::section_reveal(),
        }
    }
}

impl SectionReveal {
    /// `[opacity, offsetY, blur]` for a section at `top`/`height` (CSS px,
    /// relative to the viewport top).
    #[must_use]
    pub fn transform(&self, top: f32, height: f32, viewport_height: f32, reduced_motion: bool) -> [f32; 3] {
        let progress = scroll_progress(top, height, viewport_height);
        let t = self.keyframes.at(progress, reduced_motion);
        [t.opacity, t.offset_y, t.blur]
    }
}

/// The about-section figures, advanced by animation-frame timestamps.
#[derive(Debug, Clone)]
pub struct StatsBoard {
    stats: Vec<StatCounter>,
    last_ms: Option<f64>,
}

impl Default for StatsBoard {
    fn default() -> Self {
        Self::new(about_stats())
    }
}

impl StatsBoard {
    pub fn new(stats: Vec<StatCounter>) -> Self {
        Self { stats, last_ms: None }
    }

    pub fn labels(&self) -> Vec<String> {
        self.stats.iter().map(|s| s.label().to_string()).collect()
    }

    /// Entering view restarts every count from zero.
    pub fn set_visible(&mut self, visible: bool) {
        for stat in &mut self.stats {
            stat.set_visible(visible);
        }
    }

    /// Advance to `time_ms` and return the strings to show.
    ///
    /// The first call only records the timestamp. Timestamps that go
    /// backwards or are not finite advance nothing.
    pub fn frame(&mut self, time_ms: f64) -> Vec<String> {
        let dt = match self.last_ms {
            Some(last) => Duration::try_from_secs_f64((time_ms - last) / 1000.0).unwrap_or_default(),
            None => Duration::ZERO,
        };
        if time_ms.is_finite() {
            self.last_ms = Some(time_ms);
        }
        self.stats
            .iter_mut()
            .map(|stat| {
                stat.tick(dt);
                stat.text()
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.stats.iter().all(StatCounter::is_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reveal_fades_in_and_holds() {
        let reveal = SectionReveal::default();
        // Just entering from below: progress 0, before the first stop.
        assert_eq!(reveal.transform(800.0, 600.0, 800.0, false), [0.0, 40.0, 6.0]);
        // Halfway through the travel.
        assert_eq!(reveal.transform(100.0, 600.0, 800.0, false), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn reveal_is_static_under_reduced_motion() {
        let reveal = SectionReveal::default();
        assert_eq!(reveal.transform(800.0, 600.0, 800.0, true), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn stats_count_while_visible() {
        let mut board = StatsBoard::default();
        assert_eq!(
            board.labels(),
            vec![
                "Projects Delivered",
                "Client Satisfaction",
                "Models Deployed",
                "Team Members"
            ]
        );
        assert_eq!(board.frame(0.0), vec!["0+", "0%", "0+", "0+"]);
        board.frame(500.0);
        assert_eq!(board.frame(900.0), vec!["0+", "0%", "0+", "0+"]);

        board.set_visible(true);
        let mid = board.frame(1900.0);
        assert_ne!(mid, vec!["0+", "0%", "0+", "0+"]);
        assert!(!board.is_complete());
        assert_eq!(board.frame(3000.0), vec!["50+", "98%", "120+", "15+"]);
        assert!(board.is_complete());
    }

    #[test]
    fn backwards_time_does_not_advance() {
        let mut board = StatsBoard::default();
        board.set_visible(true);
        board.frame(1000.0);
        assert_eq!(board.frame(10.0), vec!["0+", "0%", "0+", "0+"]);
        assert_eq!(board.frame(f64::NAN), vec!["0+", "0%", "0+", "0+"]);
    }
}
