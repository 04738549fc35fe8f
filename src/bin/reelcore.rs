use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use reelcore::{Editor, EditorConfig, ProjectDocument, StillImageSource, Tier, render_frame};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelcore", version)]
struct Cli {
    /// Editor configuration JSON; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the project at a playback time as a PNG.
    Frame(FrameArgs),
    /// Print the project duration in seconds.
    Duration(DurationArgs),
    /// Print the filmstrip tier and sampling interval for a zoom level.
    Tier(TierArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width; the project canvas width when omitted.
    #[arg(long)]
    width: Option<u32>,

    /// Output height; the project canvas height when omitted.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct DurationArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TierArgs {
    /// Timeline zoom level.
    #[arg(long)]
    zoom: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::from_path(path)?,
        None => EditorConfig::default(),
    };
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args, config),
        Command::Duration(args) => cmd_duration(args, config),
        Command::Tier(args) => cmd_tier(args),
    }
}

/// Load a project, resolving relative media paths against the project file's directory.
fn load_editor(in_path: &Path, config: EditorConfig) -> anyhow::Result<Editor> {
    let mut doc = ProjectDocument::from_path(in_path)?;
    let root = in_path.parent().unwrap_or_else(|| Path::new("."));
    for asset in &mut doc.media {
        if let Some(path) = asset.path.as_mut().filter(|p| p.is_relative()) {
            *path = root.join(&*path);
        }
    }
    Ok(Editor::from_document(doc, config)?)
}

fn cmd_frame(args: FrameArgs, config: EditorConfig) -> anyhow::Result<()> {
    let editor = load_editor(&args.in_path, config)?;
    let tree = editor.scene().context("no scene composed")?;
    let width = args.width.unwrap_or(tree.canvas.width);
    let height = args.height.unwrap_or(tree.canvas.height);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("build tokio runtime")?;
    let source = StillImageSource::default();
    let image = runtime.block_on(render_frame(&source, None, &tree, args.time, width, height))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_duration(args: DurationArgs, config: EditorConfig) -> anyhow::Result<()> {
    let editor = load_editor(&args.in_path, config)?;
    println!("{}", editor.total_duration());
    Ok(())
}

fn cmd_tier(args: TierArgs) -> anyhow::Result<()> {
    let tier = Tier::for_zoom(args.zoom);
    println!("tier {} interval {}s", tier.index(), tier.interval());
    Ok(())
}
