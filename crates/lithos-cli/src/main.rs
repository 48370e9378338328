use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use glam::{IVec3, UVec3};
use lithos_cli::commands::{self, parse_offset, Context, Target};
use lithos_core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_SEED};
use lithos_core::{GenerationKey, LithosError, ProbabilityOffsets};
use lithos_persist::DirStore;
use lithos_world::ChunkRequest;

#[derive(Parser)]
#[command(name = "lithos", about = "Deterministic mineral chunks and excavation")]
struct Cli {
    /// Mineral configuration RON file (default: built-in)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Named location table RON file (default: built-in)
    #[arg(long, global = true)]
    locations: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct Sampling {
    /// Seed string
    #[arg(long, default_value = DEFAULT_SEED)]
    seed: String,
    /// Probability offset as NAME=DELTA (repeatable)
    #[arg(long = "offset", value_parser = parse_offset, allow_hyphen_values = true)]
    offsets: Vec<(String, f64)>,
    /// Only allow these minerals (repeatable)
    #[arg(long = "allow")]
    allow: Vec<String>,
}

impl Sampling {
    fn offsets(&self) -> ProbabilityOffsets {
        self.offsets.iter().cloned().collect()
    }

    fn allow(&self) -> Option<Vec<String>> {
        (!self.allow.is_empty()).then(|| self.allow.clone())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Mineral at a single global cell
    Mineral {
        #[command(flatten)]
        sampling: Sampling,
        /// Global cell (3 integers: X Y Z)
        #[arg(long, required = true, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        at: Vec<i32>,
    },
    /// Generate a cubic chunk
    Chunk {
        #[command(flatten)]
        sampling: Sampling,
        /// Chunk origin (3 integers: X Y Z)
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true, default_values_t = [0, 0, 0])]
        origin: Vec<i32>,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: u32,
        /// Print the JSON chunk response instead of a summary
        #[arg(long)]
        json: bool,
        /// Include debug info in the JSON response
        #[arg(long)]
        debug: bool,
        /// Write output to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Horizontal slice at a fixed depth
    Slice {
        #[command(flatten)]
        sampling: Sampling,
        /// Slice origin (2 integers: X Y)
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_hyphen_values = true, default_values_t = [0, 0])]
        origin: Vec<i32>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        z: i32,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: u32,
        /// Integer magnification
        #[arg(long, default_value_t = 1)]
        zoom: u32,
    },
    /// Resolve a named location
    Locate {
        query: String,
    },
    /// Open a chunk for excavation, optionally revealing voxels
    Excavate {
        #[command(flatten)]
        sampling: Sampling,
        /// Named location to excavate
        #[arg(long, conflicts_with = "origin")]
        location: Option<String>,
        /// Chunk origin (3 integers: X Y Z)
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        origin: Option<Vec<i32>>,
        /// Crust class when excavating by origin
        #[arg(long, default_value = "continental")]
        crust: String,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: u32,
        /// Local voxel to reveal (3 integers: X Y Z, repeatable)
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], action = clap::ArgAction::Append)]
        reveal: Vec<u32>,
        /// Directory holding persisted cover grids
        #[arg(long, default_value = ".lithos")]
        store_dir: PathBuf,
    },
}

fn ivec3(v: &[i32]) -> IVec3 {
    IVec3::new(
        v.first().copied().unwrap_or(0),
        v.get(1).copied().unwrap_or(0),
        v.get(2).copied().unwrap_or(0),
    )
}

fn run(cli: Cli) -> Result<String, LithosError> {
    let ctx = Context::load(cli.config.as_deref(), cli.locations.as_deref())?;

    match cli.command {
        Command::Mineral { sampling, at } => {
            let allow = sampling.allow();
            Ok(commands::mineral(
                &ctx,
                &sampling.seed,
                ivec3(&at),
                &sampling.offsets(),
                allow.as_deref(),
            ))
        }
        Command::Chunk {
            sampling,
            origin,
            size,
            json,
            debug,
            output,
        } => {
            let key = GenerationKey::new(sampling.seed.clone(), ivec3(&origin), size)
                .with_offsets(sampling.offsets())
                .with_allow(sampling.allow());
            let mut request = ChunkRequest::from_key(&key);
            request.debug = debug;
            let text = commands::chunk(&ctx, &request, json)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &text).map_err(|e| {
                        LithosError::GenerationTransportFailure(format!(
                            "failed to write {}: {e}",
                            path.display()
                        ))
                    })?;
                    log::info!("Wrote chunk to {}", path.display());
                    Ok(String::new())
                }
                None => Ok(text),
            }
        }
        Command::Slice {
            sampling,
            origin,
            z,
            size,
            zoom,
        } => {
            let origin = ivec3(&origin).truncate().extend(z);
            let key = GenerationKey::new(sampling.seed.clone(), origin, size)
                .with_offsets(sampling.offsets())
                .with_allow(sampling.allow());
            commands::slice(&ctx, &key, z, zoom)
        }
        Command::Locate { query } => commands::locate(&ctx, &query),
        Command::Excavate {
            sampling,
            location,
            origin,
            crust,
            size,
            reveal,
            store_dir,
        } => {
            let target = match (location, origin) {
                (Some(query), _) => Target::Location(query),
                (None, origin) => Target::Origin {
                    origin: ivec3(origin.as_deref().unwrap_or_default()),
                    crust_class: crust,
                    offsets: sampling.offsets(),
                },
            };
            let reveals: Vec<UVec3> = reveal
                .chunks_exact(3)
                .map(|c| UVec3::new(c[0], c[1], c[2]))
                .collect();
            let store = DirStore::new(store_dir, ctx.config_hash());
            commands::excavate(
                &ctx,
                store,
                &target,
                &sampling.seed,
                size,
                sampling.allow(),
                &reveals,
            )
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(text) => {
            if !text.is_empty() {
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
            }
        }
        Err(e) => {
            log::error!("{e}");
            process::exit(if e.is_retryable() { 75 } else { 1 });
        }
    }
}
