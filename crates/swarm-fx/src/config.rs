#![forbid(unsafe_code)]

//! Effect configuration.
//!
//! Sources layer in a fixed order: [`SwarmConfig::default`], then an optional
//! JSON document (web options, harness `--config`), then `SWARM_*`
//! environment overrides. Layering never aborts: bad values are collected in
//! [`ConfigParse::errors`] and the previous layer's value is kept.
//!
//! # Environment
//!
//! | variable                 | field                          | format |
//! |--------------------------|--------------------------------|--------|
//! | `SWARM_PHASES`           | `phases`                       | 8 comma-separated fractions |
//! | `SWARM_MAX_STAGGER`      | `max_stagger`                  | float in [0, 1) |
//! | `SWARM_BUDGET`           | `budget`                       | integer >= 1 |
//! | `SWARM_BUDGET_MOBILE`    | `budget_mobile`                | integer >= 1 |
//! | `SWARM_FONT_FAMILY`      | `font_family`                  | string |
//! | `SWARM_POINT_SIZE`       | `point_size`                   | float > 0 |
//! | `SWARM_MAX_PIXEL_RATIO`  | `max_pixel_ratio`              | float > 0 |
//! | `SWARM_REDUCED_MOTION`   | `reduced_motion`               | bool |

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const ENV_PHASES: &str = "SWARM_PHASES";
pub const ENV_MAX_STAGGER: &str = "SWARM_MAX_STAGGER";
pub const ENV_BUDGET: &str = "SWARM_BUDGET";
pub const ENV_BUDGET_MOBILE: &str = "SWARM_BUDGET_MOBILE";
pub const ENV_FONT_FAMILY: &str = "SWARM_FONT_FAMILY";
pub const ENV_POINT_SIZE: &str = "SWARM_POINT_SIZE";
pub const ENV_MAX_PIXEL_RATIO: &str = "SWARM_MAX_PIXEL_RATIO";
pub const ENV_REDUCED_MOTION: &str = "SWARM_REDUCED_MOTION";

// ---------------------------------------------------------------------------
// Phase boundaries
// ---------------------------------------------------------------------------

/// Progress fractions where the morph phases change.
///
/// Must be non-decreasing and inside [0, 1]; see [`SwarmConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseBoundaries {
    /// Particles start fading in.
    pub converge_start: f32,
    /// Fade-in done; particles start moving toward the text.
    pub morph_start: f32,
    /// Morph factor reaches 1.
    pub morph_end: f32,
    /// End of the fully resolved hold.
    pub hold_end: f32,
    /// Fade-out done; particles are invisible but still text-shaped.
    pub diverge_end: f32,
    /// Particles start fading back in.
    pub reappear_start: f32,
    /// Fade-in done; particles start scattering.
    pub disperse_start: f32,
    /// Scatter done; particles fade out for good.
    pub depart_start: f32,
}

impl PhaseBoundaries {
    /// Field names in boundary order (used in diagnostics).
    pub const FIELDS: [&'static str; 8] = [
        "converge_start",
        "morph_start",
        "morph_end",
        "hold_end",
        "diverge_end",
        "reappear_start",
        "disperse_start",
        "depart_start",
    ];

    /// Boundaries in ascending order.
    #[must_use]
    pub const fn as_array(&self) -> [f32; 8] {
        [
            self.converge_start,
            self.morph_start,
            self.morph_end,
            self.hold_end,
            self.diverge_end,
            self.reappear_start,
            self.disperse_start,
            self.depart_start,
        ]
    }

    /// Build from exactly eight values (no ordering check).
    #[must_use]
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        let &[a, b, c, d, e, f, g, h] = values else {
            return None;
        };
        Some(Self {
            converge_start: a,
            morph_start: b,
            morph_end: c,
            hold_end: d,
            diverge_end: e,
            reappear_start: f,
            disperse_start: g,
            depart_start: h,
        })
    }

    /// Midpoint of the hold, where every particle is fully resolved.
    #[must_use]
    pub fn held_midpoint(&self) -> f32 {
        (self.morph_end + self.hold_end) * 0.5
    }

    /// Steepest opacity/morph slope across all ramps (per unit progress).
    ///
    /// Zero-width ramps report `f32::INFINITY`.
    #[must_use]
    pub fn steepest_slope(&self) -> f32 {
        [
            (self.converge_start, self.morph_start),
            (self.morph_start, self.morph_end),
            (self.hold_end, self.diverge_end),
            (self.reappear_start, self.disperse_start),
            (self.disperse_start, self.depart_start),
            (self.depart_start, 1.0),
        ]
        .iter()
        .map(|&(a, b)| if b > a { 1.0 / (b - a) } else { f32::INFINITY })
        .fold(0.0, f32::max)
    }

    fn validate_into(&self, errors: &mut Vec<ConfigError>) {
        let values = self.as_array();
        for (field, value) in Self::FIELDS.iter().zip(values) {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError::new(
                    field,
                    value.to_string(),
                    "must be a fraction in [0, 1]",
                ));
            }
        }
        for (i, pair) in values.windows(2).enumerate() {
            if pair[1] < pair[0] {
                errors.push(ConfigError::new(
                    Self::FIELDS[i + 1],
                    pair[1].to_string(),
                    format!("must be >= {} ({})", Self::FIELDS[i], pair[0]),
                ));
            }
        }
    }
}

impl Default for PhaseBoundaries {
    fn default() -> Self {
        Self {
            converge_start: 0.12,
            morph_start: 0.18,
            morph_end: 0.38,
            hold_end: 0.40,
            diverge_end: 0.46,
            reappear_start: 0.58,
            disperse_start: 0.66,
            depart_start: 0.85,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A page section that gets a particle heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// DOM id of the section element; its first `h2` is the anchor.
    pub id: String,
    /// Text the particles spell.
    pub heading: String,
}

impl SectionSpec {
    pub fn new(id: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            heading: heading.into(),
        }
    }
}

/// The three tracked sections of the landing page.
#[must_use]
pub fn default_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new("services", "Our Services"),
        SectionSpec::new("about", "About Us"),
        SectionSpec::new("contact", "Get In Touch"),
    ]
}

// ---------------------------------------------------------------------------
// SwarmConfig
// ---------------------------------------------------------------------------

/// Tunables for the particle-text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub phases: PhaseBoundaries,
    /// Largest per-particle delay in morph space. Must stay below 1.
    pub max_stagger: f32,
    /// Particle budget per heading on wide viewports.
    pub budget: usize,
    /// Particle budget per heading below `mobile_breakpoint`.
    pub budget_mobile: usize,
    /// Viewport width (CSS px) below which the mobile budget applies.
    pub mobile_breakpoint: f32,
    /// Viewport width (CSS px) at and above which the large font is used.
    pub font_breakpoint: f32,
    pub font_size_large: f32,
    pub font_size_small: f32,
    pub font_family: String,
    /// Empty margin around the measured text, in px.
    pub padding: f32,
    /// Scan stride in px on both axes.
    pub sample_step: u32,
    /// Alpha must exceed this to count as foreground.
    pub alpha_threshold: u8,
    /// Base sprite diameter in device px before size and pixel ratio.
    pub point_size: f32,
    pub max_pixel_ratio: f32,
    /// Forces reduced motion regardless of the host preference.
    pub reduced_motion: bool,
    pub sections: Vec<SectionSpec>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            phases: PhaseBoundaries::default(),
            max_stagger: 0.3,
            budget: 2000,
            budget_mobile: 1000,
            mobile_breakpoint: 768.0,
            font_breakpoint: 640.0,
            font_size_large: 36.0,
            font_size_small: 28.0,
            font_family: "Geist Sans".to_string(),
            padding: 20.0,
            sample_step: 2,
            alpha_threshold: 128,
            point_size: 3.0,
            max_pixel_ratio: 1.5,
            reduced_motion: false,
            sections: default_sections(),
        }
    }
}

/// Configuration parse diagnostics (layers + validation).
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: SwarmConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl SwarmConfig {
    /// Defaults plus environment overrides.
    #[must_use]
    pub fn from_env() -> SwarmConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Defaults plus environment overrides, with diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        load_with(None, |key| env::var(key).ok())
    }

    /// Defaults, then `json`, then environment overrides.
    #[must_use]
    pub fn load(json: Option<&str>) -> ConfigParse {
        load_with(json, |key| env::var(key).ok())
    }

    /// Defaults, then `json`; the environment is not consulted.
    ///
    /// Used by the web frontend, which has no process environment.
    #[must_use]
    pub fn from_json_lenient(json: &str) -> ConfigParse {
        load_with(Some(json), |_| None)
    }

    /// Parse a full JSON document strictly (missing fields take defaults).
    pub fn from_json(json: &str) -> Result<SwarmConfig, ConfigError> {
        serde_json::from_str(json)
            .map_err(|err| ConfigError::new("json", truncate(json, 48), err.to_string()))
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        self.phases.validate_into(&mut errors);
        if !(0.0..1.0).contains(&self.max_stagger) {
            errors.push(ConfigError::new(
                "max_stagger",
                self.max_stagger.to_string(),
                "must be in [0, 1) or late particles never arrive",
            ));
        }
        validate_positive_usize("budget", self.budget, &mut errors);
        validate_positive_usize("budget_mobile", self.budget_mobile, &mut errors);
        validate_positive_f32("font_size_large", self.font_size_large, &mut errors);
        validate_positive_f32("font_size_small", self.font_size_small, &mut errors);
        validate_positive_f32("point_size", self.point_size, &mut errors);
        validate_positive_f32("max_pixel_ratio", self.max_pixel_ratio, &mut errors);
        if !self.padding.is_finite() || self.padding < 0.0 {
            errors.push(ConfigError::new(
                "padding",
                self.padding.to_string(),
                "must be >= 0",
            ));
        }
        if self.sample_step == 0 {
            errors.push(ConfigError::new("sample_step", "0", "must be >= 1"));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if section.id.trim().is_empty() {
                errors.push(ConfigError::new(
                    "sections",
                    format!("[{i}]"),
                    "section id must not be empty",
                ));
            }
            if self.sections[..i].iter().any(|s| s.id == section.id) {
                errors.push(ConfigError::new(
                    "sections",
                    section.id.clone(),
                    "duplicate section id",
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Particle budget for a viewport width in CSS px.
    #[must_use]
    pub fn budget_for_width(&self, width: f32) -> usize {
        if width < self.mobile_breakpoint {
            self.budget_mobile
        } else {
            self.budget
        }
    }

    /// Heading font size for a viewport width in CSS px.
    #[must_use]
    pub fn font_size_for_width(&self, width: f32) -> f32 {
        if width >= self.font_breakpoint {
            self.font_size_large
        } else {
            self.font_size_small
        }
    }

    /// Device pixel ratio capped at `max_pixel_ratio`; bad inputs map to 1.
    #[must_use]
    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.max_pixel_ratio)
        } else {
            1.0
        }
    }

    /// One-line summary for logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        let motion = if self.reduced_motion { "reduced" } else { "full" };
        format!(
            "swarm: {} sections, budget {}/{}, stagger {:.2}, motion {motion}",
            self.sections.len(),
            self.budget,
            self.budget_mobile,
            self.max_stagger
        )
    }
}

fn load_with<F>(json: Option<&str>, mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut errors = Vec::new();
    let mut config = match json {
        Some(text) => match SwarmConfig::from_json(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                errors.push(err);
                SwarmConfig::default()
            }
        },
        None => SwarmConfig::default(),
    };

    if let Some(value) = get(ENV_PHASES) {
        match parse_phases(&value) {
            Some(parsed) => config.phases = parsed,
            None => errors.push(ConfigError::new(
                "phases",
                value,
                "expected 8 comma-separated fractions",
            )),
        }
    }

    if let Some(value) = get(ENV_MAX_STAGGER) {
        match parse_f32(&value) {
            Some(parsed) => config.max_stagger = parsed,
            None => errors.push(ConfigError::new("max_stagger", value, "expected float")),
        }
    }

    if let Some(value) = get(ENV_BUDGET) {
        match parse_usize(&value) {
            Some(parsed) => config.budget = parsed,
            None => errors.push(ConfigError::new(
                "budget",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_BUDGET_MOBILE) {
        match parse_usize(&value) {
            Some(parsed) => config.budget_mobile = parsed,
            None => errors.push(ConfigError::new(
                "budget_mobile",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_FONT_FAMILY) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(ConfigError::new("font_family", value, "must not be empty"));
        } else {
            config.font_family = trimmed.to_string();
        }
    }

    if let Some(value) = get(ENV_POINT_SIZE) {
        match parse_f32(&value) {
            Some(parsed) => config.point_size = parsed,
            None => errors.push(ConfigError::new("point_size", value, "expected float")),
        }
    }

    if let Some(value) = get(ENV_MAX_PIXEL_RATIO) {
        match parse_f32(&value) {
            Some(parsed) => config.max_pixel_ratio = parsed,
            None => errors.push(ConfigError::new(
                "max_pixel_ratio",
                value,
                "expected float",
            )),
        }
    }

    if let Some(value) = get(ENV_REDUCED_MOTION) {
        match parse_bool(&value) {
            Some(parsed) => config.reduced_motion = parsed,
            None => errors.push(ConfigError::new(
                "reduced_motion",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Err(mut validation) = config.validate() {
        errors.append(&mut validation);
    }

    ConfigParse { config, errors }
}

#[inline]
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

#[inline]
fn parse_f32(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_phases(value: &str) -> Option<PhaseBoundaries> {
    let parsed: Option<Vec<f32>> = value.split(',').map(parse_f32).collect();
    PhaseBoundaries::from_slice(&parsed?)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

fn validate_positive_usize(field: &'static str, value: usize, errors: &mut Vec<ConfigError>) {
    if value == 0 {
        errors.push(ConfigError::new(field, "0", "must be >= 1"));
    }
}

fn validate_positive_f32(field: &'static str, value: f32, errors: &mut Vec<ConfigError>) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigError::new(field, value.to_string(), "must be > 0"));
    }
}
