//! `facefx` CLI - Composite face-anchored stickers and masks onto photos

mod cmd;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use facefx::FaceRegion;

#[derive(Parser)]
#[command(name = "facefx")]
#[command(about = "Face-anchored overlay compositing for photos and frame sequences")]
#[command(version)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite overlays onto a single photo
    Apply {
        /// Input photo
        input: PathBuf,

        /// Output image (format follows the extension)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        overlays: OverlayArgs,
    },

    /// Composite overlays onto every frame in a directory
    Sequence {
        /// Directory of frames, processed in file-name order
        dir: PathBuf,

        /// Directory to write composited frames to
        #[arg(short, long)]
        output: PathBuf,

        /// Capture rate the frames were recorded at; drives animation timing
        #[arg(long, default_value = "30")]
        capture_fps: u32,

        #[command(flatten)]
        overlays: OverlayArgs,
    },

    /// Print the anchor points derived from a face region
    Anchors {
        /// Face region
        #[arg(long, value_name = "X,Y,W,H")]
        face: FaceRegion,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Overlay options shared by `apply` and `sequence`; they override the session file
#[derive(Args, Debug, Clone, Default)]
pub struct OverlayArgs {
    /// Session file (default: ~/.config/facefx/session.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Face region; repeat for several faces (default: centered fallback)
    #[arg(long = "face", value_name = "X,Y,W,H")]
    pub faces: Vec<FaceRegion>,

    /// Sprite sheet for animated stickers (one row of frames)
    #[arg(long)]
    pub sprite_sheet: Option<PathBuf>,

    /// Sprite-sheet frame width
    #[arg(long)]
    pub frame_width: Option<u32>,

    /// Sprite-sheet frame height
    #[arg(long)]
    pub frame_height: Option<u32>,

    /// Animation speed in frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Stop on the last animation frame instead of looping
    #[arg(long)]
    pub no_loop: bool,

    /// Sticker size as a fraction of face size (0.05 to 0.5)
    #[arg(long)]
    pub sticker_scale: Option<f32>,

    /// Full-face overlay image (must have an alpha channel)
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Static sticker placed at a fixed position; repeatable
    #[arg(long = "sticker", value_name = "NAME=FILE@X,Y")]
    pub stickers: Vec<StickerArg>,
}

/// `NAME=FILE@X,Y` sticker placement
#[derive(Debug, Clone, PartialEq)]
pub struct StickerArg {
    pub name: String,
    pub path: PathBuf,
    pub x: i64,
    pub y: i64,
}

impl FromStr for StickerArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=FILE@X,Y but got '{s}'"))?;
        let (path, position) = rest
            .rsplit_once('@')
            .ok_or_else(|| format!("missing @X,Y in '{s}'"))?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y but got '{position}'"))?;

        if name.is_empty() || path.is_empty() {
            return Err(format!("empty name or file in '{s}'"));
        }

        Ok(Self {
            name: name.to_string(),
            path: PathBuf::from(path),
            x: x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?,
            y: y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?,
        })
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Apply {
            input,
            output,
            overlays,
        } => {
            cmd::apply::cmd_apply(&input, &output, &overlays)?;
        }
        Commands::Sequence {
            dir,
            output,
            capture_fps,
            overlays,
        } => {
            cmd::sequence::cmd_sequence(&dir, &output, capture_fps, &overlays)?;
        }
        Commands::Anchors { face, json } => {
            cmd::anchors::cmd_anchors(&face, json)?;
        }
    }

    Ok(())
}
