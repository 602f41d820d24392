#![forbid(unsafe_code)]

//! glyphswarm harness: renders effects offline.
//!
//! ```sh
//! swarm-harness --mode=trace --text="About Us" > trace.jsonl
//! swarm-harness --mode=ascii --progress=0.39
//! swarm-harness --mode=png --effect=network --out=hero.png
//! ```

mod cli;
mod scene;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use swarm_fx::SwarmConfig;
use tracing_subscriber::EnvFilter;

use cli::{Command, Effect, HELP_TEXT, Mode, Opts, VERSION};
use scene::{TextScene, backdrop_frame};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(opts: &Opts) -> Result<SwarmConfig, String> {
    let json = match &opts.config {
        Some(path) => Some(
            fs::read_to_string(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?,
        ),
        None => None,
    };
    let parsed = SwarmConfig::load(json.as_deref());
    for err in &parsed.errors {
        tracing::warn!(%err, "config");
    }
    parsed.config.validate().map_err(|errors| {
        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
        format!("invalid config: {}", list.join("; "))
    })?;
    Ok(parsed.config)
}

fn run(opts: Opts) -> Result<(), String> {
    let config = load_config(&opts)?;
    tracing::info!(summary = %config.summary_short(), "config loaded");
    let (vw, vh) = opts.viewport;
    let font_size = opts
        .font_size
        .unwrap_or_else(|| config.font_size_for_width(vw));
    let budget = opts.budget.unwrap_or_else(|| config.budget_for_width(vw));
    let progress = opts
        .progress
        .unwrap_or_else(|| config.phases.held_midpoint());
    let (width, height) = (vw.round() as u32, vh.round() as u32);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match opts.mode {
        Mode::Trace => {
            let scene = TextScene::build(config, &opts.text, font_size, budget, opts.seed);
            for line in scene.trace_lines(opts.steps) {
                writeln!(out, "{line}").map_err(|e| e.to_string())?;
            }
        }
        Mode::Ascii => {
            let scene = TextScene::build(config, &opts.text, font_size, budget, opts.seed);
            write!(out, "{}", scene.ascii(progress, opts.time)).map_err(|e| e.to_string())?;
        }
        Mode::Png => {
            let fb = match opts.effect {
                Effect::Text => {
                    TextScene::build(config, &opts.text, font_size, budget, opts.seed)
                        .frame(progress, opts.time, width, height)
                }
                fx => backdrop_frame(fx, width, height, progress, opts.time, opts.seed),
            };
            let mut bytes = Vec::new();
            fb.write_rgba_bytes(&mut bytes);
            let image = image::RgbaImage::from_raw(fb.width(), fb.height(), bytes)
                .ok_or_else(|| "framebuffer size mismatch".to_string())?;
            image
                .save(&opts.out)
                .map_err(|err| format!("cannot write {}: {err}", opts.out.display()))?;
            writeln!(out, "{}", opts.out.display()).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let command = match Opts::parse_from(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Run with --help for usage information.");
            return ExitCode::from(2);
        }
    };
    let opts = match command {
        Command::Help => {
            println!("{HELP_TEXT}");
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("swarm-harness {VERSION}");
            return ExitCode::SUCCESS;
        }
        Command::Run(opts) => opts,
    };
    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
