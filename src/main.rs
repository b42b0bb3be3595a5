//! Strudelcraft CLI: compile a pattern and print events, voxels or a summary as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use strudelcraft::config::{default_config_path, load_config};
use strudelcraft::dsl::{Compilation, Compiler, PatternKind, Step};
use strudelcraft::source::SourceRef;
use strudelcraft::voxel::{dedupe_occupied, SpawnPlan};

#[derive(Parser)]
#[command(name = "strudelcraft", version)]
#[command(about = "Compile Strudel patterns into events and voxels", long_about = None)]
struct Cli {
    #[command(flatten)]
    input: Input,

    /// Number of cycles to generate (overrides the config file)
    #[arg(short, long)]
    cycles: Option<u32>,

    /// Config file (default: ~/.strudelcraft/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
#[group(multiple = false)]
struct Input {
    /// Inline pattern code
    #[arg(long)]
    code: Option<String>,

    /// Page URL carrying the pattern (`?code=`, share ID, or `#hash`)
    #[arg(long)]
    url: Option<String>,

    /// Base64 hash payload
    #[arg(long)]
    hash: Option<String>,

    /// Share ID (cannot be fetched offline)
    #[arg(long)]
    share_id: Option<String>,

    /// File containing pattern code
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the status line and the event list
    Events,

    /// Print the voxel point cloud
    Voxels {
        /// Keep only the first voxel per occupied cell
        #[arg(long)]
        dedupe: bool,
    },

    /// Print the parsed blocks and their steps
    Blocks,

    /// Print counts and the spawn plan (default)
    Summary,
}

#[derive(Serialize)]
struct EventsOutput<'a> {
    status: &'a str,
    events: &'a [strudelcraft::event::Event],
}

#[derive(Serialize)]
struct BlockOutput<'a> {
    lane: u32,
    kind: PatternKind,
    body: &'a str,
    modifiers: &'a str,
    rate: f64,
    slots_per_cycle: usize,
    steps: &'a [Step],
}

#[derive(Serialize)]
struct Summary<'a> {
    status: &'a str,
    blocks: usize,
    events: usize,
    voxels: usize,
    occupied: usize,
    spawn: Option<SpawnPlan>,
}

impl Input {
    fn source(&self) -> Result<Option<SourceRef>> {
        if let Some(code) = &self.code {
            return Ok(Some(SourceRef::code(code.as_str())));
        }
        if let Some(url) = &self.url {
            let Some(source) = SourceRef::from_location(url) else {
                bail!("no pattern source found in {url}");
            };
            return Ok(Some(source));
        }
        if let Some(hash) = &self.hash {
            return Ok(Some(SourceRef::hash(hash.as_str())));
        }
        if let Some(id) = &self.share_id {
            return Ok(Some(SourceRef::share_id(id.as_str())));
        }
        if let Some(path) = &self.file {
            let code = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return Ok(Some(SourceRef::code(code)));
        }
        Ok(None)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    if let Some(cycles) = cli.cycles {
        config.cycles = cycles.max(1);
    }

    let source = cli.input.source()?;
    let compilation = Compiler::compile_source(source.as_ref(), &config.compile_options());
    let mapper = config.voxel_mapper();

    let json = match cli.command.unwrap_or(Commands::Summary) {
        Commands::Events => serde_json::to_string_pretty(&EventsOutput {
            status: &compilation.status,
            events: &compilation.events,
        })?,
        Commands::Voxels { dedupe } => {
            let voxels = mapper.map(&compilation.events);
            let voxels = if dedupe {
                dedupe_occupied(&voxels)
            } else {
                voxels
            };
            serde_json::to_string_pretty(&voxels)?
        }
        Commands::Blocks => serde_json::to_string_pretty(&block_outputs(&compilation))?,
        Commands::Summary => {
            let voxels = mapper.map(&compilation.events);
            serde_json::to_string_pretty(&Summary {
                status: &compilation.status,
                blocks: compilation.lanes(),
                events: compilation.events.len(),
                voxels: voxels.len(),
                occupied: dedupe_occupied(&voxels).len(),
                spawn: SpawnPlan::compute(&voxels, &config.mapping),
            })?
        }
    };

    println!("{json}");
    Ok(())
}

fn block_outputs(compilation: &Compilation) -> Vec<BlockOutput<'_>> {
    compilation
        .blocks
        .iter()
        .map(|block| BlockOutput {
            lane: block.lane,
            kind: block.kind(),
            body: &block.block.body,
            modifiers: &block.block.modifiers,
            rate: block.rate,
            slots_per_cycle: block.slots_per_cycle(),
            steps: &block.steps,
        })
        .collect()
}
