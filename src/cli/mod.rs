//! Command-line interface for citeproof.
//!
//! Provides commands for verifying claims against an extracted layout,
//! computing highlight geometry, counting words, and showing the
//! resolved configuration.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{self, ResolvedConfig};
use crate::core::{SafetyViolation, Verifier};
use crate::domain::{BoundingBox, Claim, SourceLayout, Verification};
use crate::evidence::{
    claim_key, compute_origin_percent, compute_scroll_target, to_percent_rect, word_count_with_limits,
    CssRect, OriginPercent, PercentRect, RenderScale, ScrollTarget,
};

/// citeproof - Locate and verify quoted claims in extracted documents
#[derive(Parser, Debug)]
#[command(name = "citeproof")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (discovered from .citeproof/config.yaml if not provided)
    #[arg(long, global = true, env = "CITEPROOF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify claims against a source layout
    Verify {
        /// Source layout JSON (pages of text items)
        #[arg(short, long)]
        layout: PathBuf,

        /// Claims JSON (array of claims)
        #[arg(short, long)]
        claims: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Compute highlight geometry for one box
    Rect(RectArgs),

    /// Count words (reads from stdin if no input file)
    Words {
        /// Input file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Box and render context for the `rect` command
#[derive(Args, Debug)]
pub struct RectArgs {
    /// Left edge in document units
    #[arg(long, allow_hyphen_values = true)]
    pub x: f64,

    /// Top edge in document units (bottom-up y-axis)
    #[arg(long, allow_hyphen_values = true)]
    pub y: f64,

    #[arg(long)]
    pub width: f64,

    #[arg(long)]
    pub height: f64,

    /// Document units to pixels, horizontal
    #[arg(long, default_value = "1.0")]
    pub scale_x: f64,

    /// Document units to pixels, vertical
    #[arg(long, default_value = "1.0")]
    pub scale_y: f64,

    #[arg(long)]
    pub image_width: f64,

    #[arg(long)]
    pub image_height: f64,

    /// Zoom factor for the scroll target
    #[arg(long, default_value = "1.0")]
    pub zoom: f64,

    /// Container width for the scroll target
    #[arg(long, requires = "container_height")]
    pub container_width: Option<f64>,

    /// Container height for the scroll target
    #[arg(long, requires = "container_width")]
    pub container_height: Option<f64>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let resolved = resolve_config(self.config.as_deref())?;

        match self.command {
            Commands::Verify {
                layout,
                claims,
                pretty,
            } => verify_claims(resolved, &layout, &claims, pretty).await,
            Commands::Rect(args) => show_rect(&args),
            Commands::Words { input } => count_words(&resolved, input),
            Commands::Config => show_config(&resolved),
        }
    }
}

/// Explicit config path wins; otherwise the cached discovered config
fn resolve_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    match explicit {
        Some(path) => config::load_config(Some(path)),
        None => config::config().cloned(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

/// Per-claim output of `verify`
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ClaimReport {
    Verified {
        key: String,
        verification: Verification,
        /// Whether the anchor gets its own highlight
        anchor_highlight: bool,
    },
    Refused {
        key: String,
        error: String,
    },
}

/// Verify every claim, one blocking task per claim
async fn verify_claims(resolved: ResolvedConfig, layout_path: &Path, claims_path: &Path, pretty: bool) -> Result<()> {
    let layout: SourceLayout = read_json(layout_path)?;
    let claims: Vec<Claim> = read_json(claims_path)?;
    debug!(pages = layout.page_count(), claims = claims.len(), "Loaded inputs");

    let layout = Arc::new(layout);
    let verifier = Arc::new(Verifier::new(resolved.engine));

    let tasks: Vec<_> = claims
        .into_iter()
        .map(|claim| {
            let layout = Arc::clone(&layout);
            let verifier = Arc::clone(&verifier);
            tokio::task::spawn_blocking(move || verify_one(&verifier, &claim, &layout))
        })
        .collect();

    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        reports.push(task.await.context("Verification task failed")?);
    }

    print_json(&reports, pretty)
}

fn verify_one(verifier: &Verifier, claim: &Claim, layout: &SourceLayout) -> ClaimReport {
    let key = claim_key(claim);
    let highlight = &verifier.config().highlight;
    let outcome = verifier.verify(claim, layout).and_then(|verification| {
        let anchor_highlight = verification
            .anchor_highlight(highlight.min_word_difference, &verifier.config().safety)?
            .is_some();
        Ok::<_, SafetyViolation>((verification, anchor_highlight))
    });

    match outcome {
        Ok((verification, anchor_highlight)) => ClaimReport::Verified {
            key,
            verification,
            anchor_highlight,
        },
        Err(violation) => ClaimReport::Refused {
            key,
            error: violation.to_string(),
        },
    }
}

#[derive(Debug, Serialize)]
struct RectReport {
    rect: PercentRect,
    css: CssRect,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<OriginPercent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scroll: Option<ScrollTarget>,
}

fn show_rect(args: &RectArgs) -> Result<()> {
    let bbox = BoundingBox::new(args.x, args.y, args.width, args.height);
    let scale = RenderScale::new(args.scale_x, args.scale_y);

    let Some(rect) = to_percent_rect(&bbox, scale, args.image_width, args.image_height) else {
        println!("no highlight available");
        return Ok(());
    };
    let origin = compute_origin_percent(&bbox, scale, args.image_width, args.image_height);
    let scroll = match (args.container_width, args.container_height) {
        (Some(width), Some(height)) => compute_scroll_target(
            &bbox,
            scale,
            args.image_width,
            args.image_height,
            args.zoom,
            width,
            height,
        ),
        _ => None,
    };

    print_json(
        &RectReport {
            rect,
            css: rect.to_css(),
            origin,
            scroll,
        },
        true,
    )
}

fn count_words(resolved: &ResolvedConfig, input: Option<PathBuf>) -> Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    let count = word_count_with_limits(&text, &resolved.engine.safety)?;
    println!("{}", count);
    Ok(())
}

fn show_config(resolved: &ResolvedConfig) -> Result<()> {
    println!("citeproof configuration");
    println!();
    println!(
        "Config file: {}",
        resolved
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    let yaml = serde_yaml::to_string(&resolved.engine).context("Failed to render configuration")?;
    print!("{}", yaml);

    Ok(())
}
