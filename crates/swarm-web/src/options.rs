#![forbid(unsafe_code)]

//! Options accepted by the JS constructors.
//!
//! ```json
//! { "seed": 7, "reducedMotion": false, "config": { "budget": 1500 } }
//! ```
//!
//! Every key is optional. Bad input never throws: problems are collected as
//! diagnostics (exposed to JS as a JSON array of strings) and the defaults
//! are kept.

use serde::Deserialize;
use swarm_fx::SwarmConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOptions {
    seed: Option<u64>,
    reduced_motion: Option<bool>,
    config: Option<serde_json::Value>,
}

/// Options after layering and validation.
#[derive(Debug, Clone)]
pub struct WebOptions {
    pub config: SwarmConfig,
    /// Fixed particle seed; `None` seeds from the host's randomness.
    pub seed: Option<u64>,
    /// Explicit override of the `prefers-reduced-motion` media query.
    pub reduced_motion: Option<bool>,
    pub diagnostics: Vec<String>,
}

impl WebOptions {
    /// Resolve an optional JSON options string.
    #[must_use]
    pub fn resolve(json: Option<&str>) -> Self {
        let mut diagnostics = Vec::new();
        let raw = match json.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => serde_json::from_str::<RawOptions>(text).unwrap_or_else(|err| {
                diagnostics.push(format!("options: {err}"));
                RawOptions::default()
            }),
            None => RawOptions::default(),
        };

        let config = match raw.config {
            Some(value) => {
                let parsed = SwarmConfig::from_json_lenient(&value.to_string());
                diagnostics.extend(parsed.errors.iter().map(ToString::to_string));
                if parsed.config.validate().is_ok() {
                    parsed.config
                } else {
                    SwarmConfig::default()
                }
            }
            None => SwarmConfig::default(),
        };

        for line in &diagnostics {
            swarm_core::warn!(diagnostic = %line, "ignoring bad overlay option");
        }

        Self {
            config,
            seed: raw.seed,
            reduced_motion: raw.reduced_motion,
            diagnostics,
        }
    }

    /// Diagnostics as a JSON array.
    #[must_use]
    pub fn diagnostics_json(&self) -> String {
        serde_json::to_string(&self.diagnostics).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Turn a uniform `[0, 1)` host random number into a 53-bit seed.
#[must_use]
pub fn seed_from_unit(unit: f64) -> u64 {
    const SCALE: f64 = (1u64 << 53) as f64;
    if unit.is_finite() && unit > 0.0 {
        (unit.min(1.0) * SCALE) as u64
    } else {
        0
    }
}

/// CSS selectors for a section and its heading.
#[must_use]
pub fn section_selectors(id: &str) -> (String, String) {
    (format!("#{id}"), format!("#{id} h2"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_options_are_defaults() {
        let opts = WebOptions::resolve(None);
        assert_eq!(opts.config, SwarmConfig::default());
        assert_eq!(opts.seed, None);
        assert!(opts.diagnostics.is_empty());
        assert_eq!(opts.diagnostics_json(), "[]");
    }

    #[test]
    fn camel_case_keys_and_nested_config() {
        let opts = WebOptions::resolve(Some(
            r#"{"seed": 9, "reducedMotion": true, "config": {"budget": 1500}}"#,
        ));
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.reduced_motion, Some(true));
        assert_eq!(opts.config.budget, 1500);
        assert!(opts.diagnostics.is_empty());
    }

    #[test]
    fn malformed_options_report_and_fall_back() {
        let opts = WebOptions::resolve(Some("{not json"));
        assert_eq!(opts.config, SwarmConfig::default());
        assert_eq!(opts.diagnostics.len(), 1);
        assert!(opts.diagnostics[0].starts_with("options:"));
    }

    #[test]
    fn invalid_config_keeps_defaults() {
        let opts = WebOptions::resolve(Some(r#"{"config": {"max_stagger": 1.5}}"#));
        assert_eq!(opts.config.max_stagger, SwarmConfig::default().max_stagger);
        assert!(opts.diagnostics.iter().any(|d| d.starts_with("max_stagger=1.5")));
    }

    #[test]
    fn seeds_and_selectors() {
        assert_eq!(seed_from_unit(0.0), 0);
        assert_eq!(seed_from_unit(f64::NAN), 0);
        assert_eq!(seed_from_unit(0.5), 1u64 << 52);
        assert_eq!(
            section_selectors("about"),
            ("#about".to_string(), "#about h2".to_string())
        );
    }
}
