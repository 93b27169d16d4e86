use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spritemotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole animation (.gif, .png sequence, or .mp4/.mov/.mkv/.webm via ffmpeg).
    Render(RenderArgs),
    /// Render a single frame at a given time as a PNG.
    Frame(FrameArgs),
    /// Print canvas, duration and sprite information.
    Summary(SceneArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Directory sprite images are resolved against (default: the scene file's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Background color (#RRGGBB or #RRGGBBAA).
    #[arg(long, default_value = "#ffffff")]
    bg: String,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output path; the extension selects the format.
    #[arg(long)]
    out: PathBuf,

    /// Override the scene duration (seconds).
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Sample time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

fn load_animation(args: &SceneArgs) -> anyhow::Result<spritemotion::Animation> {
    let assets_dir = match &args.assets {
        Some(dir) => dir.clone(),
        None => args
            .scene
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let opts = spritemotion::AnimationOpts {
        canvas: spritemotion::Canvas::new(args.width, args.height)?,
        fps: spritemotion::Fps::whole(args.fps)?,
        bg_rgba: spritemotion::parse_hex_rgba(&args.bg)
            .with_context(|| format!("parse --bg '{}'", args.bg))?,
    };
    let anim = spritemotion::Animation::new(&assets_dir, &args.scene, opts)
        .with_context(|| format!("load scene '{}'", args.scene.display()))?;
    Ok(anim)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut anim = load_animation(&args.scene)?;
    let stats = anim
        .export(&args.out, args.duration)
        .with_context(|| format!("export '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames, {:.3}s)",
        args.out.display(),
        stats.frames,
        stats.duration_secs
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut anim = load_animation(&args.scene)?;
    let frame = anim.frame_at(args.time)?;

    spritemotion::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_summary(args: SceneArgs) -> anyhow::Result<()> {
    let anim = load_animation(&args)?;
    println!("{}", anim.summary());
    Ok(())
}
