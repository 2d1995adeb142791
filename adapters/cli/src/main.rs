#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates arenas and prints what was built.

mod ascii;
mod config_file;
mod layout_transfer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use arena_core::ArenaConfig;
use arena_system_analytics::LayoutReport;
use arena_system_bootstrap::Bootstrap;
use clap::Parser;

/// Procedural multi-room arena generator.
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(author, version, about = "Generate a multi-room arena layout", long_about = None)]
struct Args {
    /// TOML configuration file; missing fields keep their defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Replay code produced by `--code`; overrides every other layout option
    #[arg(long = "from-code", conflicts_with_all = ["config", "seed", "random_seed"])]
    from_code: Option<String>,

    /// Generation seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Draw a fresh seed instead of the configured one
    #[arg(long = "random-seed")]
    random_seed: bool,

    /// Grid width in cells
    #[arg(long = "width")]
    width: Option<u32>,

    /// Grid depth in cells
    #[arg(long = "depth")]
    depth: Option<u32>,

    /// Number of rooms to try to place, spawn room included
    #[arg(long = "rooms")]
    rooms: Option<u32>,

    /// Print a top-down map
    #[arg(long = "ascii")]
    ascii: bool,

    /// Print the layout report (default when nothing else is requested)
    #[arg(long = "report")]
    report: bool,

    /// Print the layout report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Print a replay code for the generated arena
    #[arg(long = "code")]
    code: bool,

    /// Log generation details
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<ArenaConfig> {
        if let Some(code) = &self.from_code {
            return layout_transfer::decode(code).context("invalid --from-code value");
        }

        let mut config = match &self.config {
            Some(path) => config_file::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ArenaConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
            config.use_random_seed = false;
        }
        if self.random_seed {
            config.use_random_seed = true;
        }
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(depth) = self.depth {
            config.grid.depth = depth;
        }
        if let Some(rooms) = self.rooms {
            config.layout.desired_room_count = rooms;
        }
        Ok(config)
    }

    fn wants_report(&self) -> bool {
        self.report || !(self.ascii || self.json || self.code)
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(fallback))
        .format_timestamp(None)
        .init();
}

/// Entry point for the arena command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.resolve_config()?;
    let arena = Bootstrap.generate(&config);
    log::info!("seed {} produced {} rooms", arena.seed(), arena.rooms().len());

    if args.ascii {
        print!("{}", ascii::render(&arena));
    }
    let report = LayoutReport::from_arena(&arena);
    if args.wants_report() {
        println!("{report}");
    }
    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialise layout report")?;
        println!("{json}");
    }
    if args.code {
        let code = layout_transfer::encode(arena.config()).context("failed to encode layout")?;
        println!("{code}");
    }
    Ok(())
}
