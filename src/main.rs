//! designkit - command line access to the editor helpers
//!
//! # Usage
//!
//! ```bash
//! designkit id                        # Element id (configured length)
//! designkit id --weak                 # Time-biased dirty marker
//! designkit fit 1920 1080 800 800     # Centered fit of an item in a box
//! designkit clone page.json           # Copy a page with fresh dirty markers
//! designkit parent page.json logo     # Parent of a layer
//! designkit merge update.json layer.json
//! designkit font Inter                # Load a font from the asset root
//! ```
//!
//! Logs go to stderr; results to stdout.

use clap::{Parser, Subcommand};
use designkit::config::{self, EditorConfig};
use designkit::core::ids::{DEFAULT_RANDOM_DIGITS, create_id, random_id};
use designkit::core::layers::{ParentLookup, clone_json, find_parent_by_id};
use designkit::core::merge::copy_values;
use designkit::fonts::{AssetFontSet, FontRegistry};
use designkit::{Page, Size, calc_size_and_position};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "designkit", version, about = "Design editor helpers")]
struct Cli {
    /// Config file (defaults to config.json in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an element id
    Id {
        /// Id length (random digits with --weak)
        #[arg(long)]
        len: Option<usize>,
        /// Generate a time-biased dirty marker instead
        #[arg(long)]
        weak: bool,
    },
    /// Fit an item inside a box and print size and center
    Fit {
        #[arg(allow_negative_numbers = true)]
        item_width: f64,
        #[arg(allow_negative_numbers = true)]
        item_height: f64,
        #[arg(allow_negative_numbers = true)]
        box_width: f64,
        #[arg(allow_negative_numbers = true)]
        box_height: f64,
    },
    /// Copy a page document, stamping every layer with a new dirty marker
    Clone { page: PathBuf },
    /// Print the parent of a layer
    Parent { page: PathBuf, id: String },
    /// Copy the fields of SOURCE into TARGET and print the result
    Merge { source: PathBuf, target: PathBuf },
    /// Load a font family from the asset root
    Font {
        family: String,
        /// Font URL (defaults to the family's conventional path)
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create Tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => config::load_config_from(path).await?,
        None => config::load_config().await,
    };

    match cli.command {
        Commands::Id { len, weak } => {
            if weak {
                println!("{}", random_id(len.unwrap_or(DEFAULT_RANDOM_DIGITS)));
            } else {
                println!("{}", create_id(len.unwrap_or(config.id_length)));
            }
        }
        Commands::Fit {
            item_width,
            item_height,
            box_width,
            box_height,
        } => {
            let report = describe_fit(
                Size::new(item_width, item_height),
                Size::new(box_width, box_height),
            )?;
            println!("{report}");
        }
        Commands::Clone { page } => {
            let copy = clone_json(&read_json(&page).await?)?;
            println!("{}", serde_json::to_string_pretty(&copy)?);
        }
        Commands::Parent { page, id } => {
            let page: Page = serde_json::from_value(read_json(&page).await?)?;
            println!("{}", describe_parent(&page, &id)?);
        }
        Commands::Merge { source, target } => {
            let source = read_json(&source).await?;
            let mut target = read_json(&target).await?;
            if !copy_values(&source, &mut target) {
                return Err("Both documents must be JSON objects".into());
            }
            println!("{}", serde_json::to_string_pretty(&target)?);
        }
        Commands::Font { family, url } => {
            load_font(&config, &family, url.as_deref()).await?;
        }
    }
    Ok(())
}

fn describe_fit(item: Size, bounds: Size) -> Result<String, Box<dyn std::error::Error>> {
    let fit = calc_size_and_position(item, bounds)
        .ok_or("All dimensions must be positive finite numbers")?;
    let (left, top) = fit.origin();
    Ok(format!(
        "size:   {} x {}\ncenter: ({}, {})\norigin: ({left}, {top})",
        fit.width, fit.height, fit.x, fit.y
    ))
}

fn describe_parent(page: &Page, id: &str) -> Result<String, Box<dyn std::error::Error>> {
    match find_parent_by_id(&page.layers, id) {
        ParentLookup::Parent(parent) => Ok(parent.id.clone()),
        ParentLookup::Root => Ok(format!("'{id}' is a root layer")),
        ParentLookup::NotFound => Err(format!("No layer with id '{id}'").into()),
    }
}

async fn read_json(path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

async fn load_font(
    config: &EditorConfig,
    family: &str,
    url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = FontRegistry::from_config(AssetFontSet::new(&config.asset_root), config);
    let outcome = registry.load_font(family, url).await?;
    println!(
        "{family}: {outcome} ({} faces)",
        registry.backend().faces(family).len()
    );
    Ok(())
}
