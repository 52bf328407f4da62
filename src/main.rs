use clap::{Parser, Subcommand};
use slidecheck::loader;
use slidecheck::registry::ComponentRegistry;
use slidecheck::schema::DEFAULT_MAX_DEPTH;
use slidecheck::validate::Validator;
use slidecheck::{Result, Sanitizer, diagnostics};

use anyhow::{Context, bail};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "slidecheck")]
#[command(about = "Validate and sanitize JSON slide documents", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one slide; print the normalized slide or every issue found.
    Validate {
        #[arg(long)]
        slide: String,

        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Sanitize one slide (never fails on odd input).
    Sanitize {
        #[arg(long)]
        slide: String,

        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },

    /// Load a deck through its manifest and audit it against a registry.
    Load {
        #[arg(long)]
        dir: String,

        /// Registry JSON (charts, templates, icons). Built-in lists if omitted.
        #[arg(long)]
        registry: Option<String>,

        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        #[arg(short = 'o', long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_tracing(cli.verbose)?;

    match cli.cmd {
        Commands::Validate { slide, max_depth } => {
            let value = read_json(&slide)?;
            let validator = Validator::new().with_max_depth(max_depth);
            match validator.validate(&value) {
                Ok(parsed) => {
                    info!(slide = %slide, "slide is valid");
                    println!("{}", serde_json::to_string_pretty(&parsed)?);
                }
                Err(err) => {
                    for issue in err.issues() {
                        eprintln!("{}: {}", slide, issue);
                    }
                    bail!("{} failed validation ({} issue(s))", slide, err.issues().len());
                }
            }
        }

        Commands::Sanitize {
            slide,
            max_depth,
            out,
        } => {
            let value = read_json(&slide)?;
            let sanitized = Sanitizer::new()
                .with_max_depth(max_depth)
                .sanitize_slide(&value);
            emit(&sanitized, out.as_deref())?;
        }

        Commands::Load {
            dir,
            registry,
            max_depth,
            out,
        } => {
            // 1) Registry (explicit, never global).
            let registry = match registry {
                Some(path) => ComponentRegistry::load(&path)?,
                None => ComponentRegistry::builtin()?,
            };

            // 2) Load deck: validate, then sanitize, skipping bad slides.
            let validator = Validator::new().with_max_depth(max_depth);
            let deck = loader::load_deck(Path::new(&dir), &validator)?;

            // 3) Audit what a renderer would drop.
            for loaded in &deck.slides {
                let report = registry.audit(&loaded.slide);
                for blocked in &report.blocked {
                    warn!(
                        file = %loaded.file,
                        path = %blocked.path,
                        "renderer would drop element: {}",
                        blocked.reason
                    );
                }
            }

            emit(&deck, Some(out.as_str()))?;
            println!("Wrote {}", out);
        }
    }

    Ok(())
}

fn read_json(path: &str) -> Result<serde_json::Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read slide file {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parse slide file {}", path))
}

fn emit<T: Serialize>(value: &T, out: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("write {}", path))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
