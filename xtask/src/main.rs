//! Workspace tasks: options schema generation and preset validation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scene_controls::Options;

#[derive(Parser, Debug)]
#[command(about = "scene-controls build tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the JSON schema of the UI-exposed options.
    Schema {
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Parse a TOML preset and report the effective values.
    CheckOptions {
        /// Preset to validate.
        file: PathBuf,
    },
    /// Write the default options as a TOML preset.
    ExportDefaults {
        /// Output file.
        #[arg(long, default_value = "options.toml")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Schema { out } => {
            let schema = serde_json::to_string_pretty(&Options::json_schema())?;
            match out {
                Some(path) => {
                    std::fs::write(&path, schema).with_context(|| {
                        format!("writing {}", path.display())
                    })?;
                    println!("wrote {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
        Command::CheckOptions { file } => {
            let options = Options::load(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            println!(
                "{} ok: spawn depth {}, scale {}..{}, rotation {}..{}",
                file.display(),
                options.objects.spawn_depth,
                options.sliders.scale_min,
                options.sliders.scale_max,
                options.sliders.rotation_min,
                options.sliders.rotation_max,
            );
        }
        Command::ExportDefaults { out } => {
            Options::default()
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("wrote {}", out.display());
        }
    }

    Ok(())
}
