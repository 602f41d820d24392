#![forbid(unsafe_code)]

//! Command-line argument parsing for the harness.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.

use std::fmt;
use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
glyphswarm harness: render particle effects offline

USAGE:
    swarm-harness [OPTIONS]

OPTIONS:
    --mode=MODE          trace (default), ascii, or png
    --effect=FX          png only: text (default), field, or network
    --text=TEXT          Heading to sample (default: \"About Us\")
    --font-size=PX       Font size in px (default: from viewport width)
    --budget=N           Particle budget (default: from viewport width)
    --viewport=WxH       Viewport in CSS px (default: 1280x800)
    --progress=P         Section progress for ascii/png (default: held midpoint)
    --time=SECONDS       Animation clock for ascii/png (default: 0)
    --steps=N            Trace resolution (default: 100)
    --seed=N             RNG seed (default: 1)
    --config=PATH        JSON config layered under SWARM_* overrides
    --out=PATH           PNG output path (default: frame.png)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    SWARM_*              Config overrides (see swarm-fx config docs)
    RUST_LOG             Log filter (default: warn)";

/// What to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One JSON line per progress step.
    Trace,
    /// Text-art preview of one frame.
    Ascii,
    /// One frame written as PNG.
    Png,
}

/// Which effect the PNG mode draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Text,
    Field,
    Network,
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub mode: Mode,
    pub effect: Effect,
    pub text: String,
    pub font_size: Option<f32>,
    pub budget: Option<usize>,
    pub viewport: (f32, f32),
    pub progress: Option<f32>,
    pub time: f32,
    pub steps: u32,
    pub seed: u64,
    pub config: Option<PathBuf>,
    pub out: PathBuf,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            mode: Mode::Trace,
            effect: Effect::Text,
            text: "About Us".into(),
            font_size: None,
            budget: None,
            viewport: (1280.0, 800.0),
            progress: None,
            time: 0.0,
            steps: 100,
            seed: 1,
            config: None,
            out: PathBuf::from("frame.png"),
        }
    }
}

/// Outcome of parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// A usage error, reported on stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

fn invalid(flag: &str, value: &str) -> UsageError {
    UsageError(format!("Invalid {flag} value: {value}"))
}

fn number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, UsageError> {
    value.parse().map_err(|_| invalid(flag, value))
}

fn finite(flag: &str, value: &str) -> Result<f32, UsageError> {
    let v: f32 = number(flag, value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(flag, value))
    }
}

fn viewport(value: &str) -> Result<(f32, f32), UsageError> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| invalid("--viewport", value))?;
    let (w, h) = (finite("--viewport", w)?, finite("--viewport", h)?);
    if w > 0.0 && h > 0.0 {
        Ok((w, h))
    } else {
        Err(invalid("--viewport", value))
    }
}

impl Opts {
    /// Parse arguments (without the program name).
    pub fn parse_from<I, S>(args: I) -> Result<Command, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    let Some((flag, val)) = other.split_once('=') else {
                        return Err(UsageError(format!("Unknown argument: {other}")));
                    };
                    match flag {
                        "--mode" => {
                            opts.mode = match val {
                                "trace" => Mode::Trace,
                                "ascii" => Mode::Ascii,
                                "png" => Mode::Png,
                                _ => return Err(invalid(flag, val)),
                            }
                        }
                        "--effect" => {
                            opts.effect = match val {
                                "text" => Effect::Text,
                                "field" => Effect::Field,
                                "network" => Effect::Network,
                                _ => return Err(invalid(flag, val)),
                            }
                        }
                        "--text" => opts.text = val.to_string(),
                        "--font-size" => {
                            let px = finite(flag, val)?;
                            if px <= 0.0 {
                                return Err(invalid(flag, val));
                            }
                            opts.font_size = Some(px);
                        }
                        "--budget" => opts.budget = Some(number(flag, val)?),
                        "--viewport" => opts.viewport = viewport(val)?,
                        "--progress" => {
                            let p = finite(flag, val)?;
                            if !(0.0..=1.0).contains(&p) {
                                return Err(invalid(flag, val));
                            }
                            opts.progress = Some(p);
                        }
                        "--time" => opts.time = finite(flag, val)?,
                        "--steps" => {
                            opts.steps = number(flag, val)?;
                            if opts.steps == 0 {
                                return Err(invalid(flag, val));
                            }
                        }
                        "--seed" => opts.seed = number(flag, val)?,
                        "--config" => opts.config = Some(PathBuf::from(val)),
                        "--out" => opts.out = PathBuf::from(val),
                        _ => return Err(UsageError(format!("Unknown argument: {other}"))),
                    }
                }
            }
        }
        Ok(Command::Run(opts))
    }
}
