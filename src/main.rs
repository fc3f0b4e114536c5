use std::fs;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use escape_fractals::{
    ComplexPoint, DEFAULT_JULIA_CONSTANT, DEFAULT_SEQUENCE_DIMENSION, DEFAULT_SWEEP_DIRECTORY,
    DEFAULT_ZOOM_CENTER, DEFAULT_ZOOM_DIRECTORY, DirectorySink, Frame, JuliaSweep, NeverCancel,
    RenderConfig, ZoomSequence, render, run_animation, run_sequence, write_gif, write_ppm,
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "fractals", version, about = "Render Mandelbrot and Julia sets as PPM images")]
struct Cli {
    /// Log render timings and per-frame progress.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single Mandelbrot image.
    Mandelbrot(MandelbrotArgs),
    /// Render a single Julia set image.
    Julia(JuliaArgs),
    /// Render a Mandelbrot zoom sequence into a directory.
    Zoom(ZoomArgs),
    /// Render Julia sets for constants along the diagonal into a directory.
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct MandelbrotArgs {
    /// Width and height in pixels.
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_DIMENSION)]
    dimension: usize,

    /// Window scale; values below 1 magnify.
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    center_real: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    center_imag: f64,

    #[arg(long)]
    max_iterations: Option<u32>,

    /// Output PPM path.
    #[arg(long, default_value = "Mandelbrot_and_julia_sets/mandelbrot.ppm")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct JuliaArgs {
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_DIMENSION)]
    dimension: usize,

    /// Real part of the Julia constant.
    #[arg(long, default_value_t = DEFAULT_JULIA_CONSTANT.real, allow_negative_numbers = true)]
    real: f64,

    /// Imaginary part of the Julia constant.
    #[arg(long, default_value_t = DEFAULT_JULIA_CONSTANT.imag, allow_negative_numbers = true)]
    imag: f64,

    #[arg(long)]
    max_iterations: Option<u32>,

    #[arg(long, default_value = "Mandelbrot_and_julia_sets/julia.ppm")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ZoomArgs {
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_DIMENSION)]
    dimension: usize,

    #[arg(long, default_value_t = 1.0)]
    start: f64,

    #[arg(long, default_value_t = 0.1)]
    end: f64,

    #[arg(long, default_value_t = 0.05)]
    step: f64,

    #[arg(long, default_value_t = DEFAULT_ZOOM_CENTER.real, allow_negative_numbers = true)]
    center_real: f64,

    #[arg(long, default_value_t = DEFAULT_ZOOM_CENTER.imag, allow_negative_numbers = true)]
    center_imag: f64,

    #[arg(long)]
    max_iterations: Option<u32>,

    #[arg(long, default_value = DEFAULT_ZOOM_DIRECTORY)]
    dir: PathBuf,

    /// Also loop the frames forward and back into an animated GIF at this path.
    #[arg(long)]
    gif: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_DIMENSION)]
    dimension: usize,

    /// Number of images; frame i uses the constant (i * step, -i * step).
    #[arg(long, default_value_t = 10)]
    frames: usize,

    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    step: f64,

    #[arg(long)]
    max_iterations: Option<u32>,

    #[arg(long, default_value = DEFAULT_SWEEP_DIRECTORY)]
    dir: PathBuf,

    /// Also loop the frames forward and back into an animated GIF at this path.
    #[arg(long)]
    gif: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Mandelbrot(args) => cmd_mandelbrot(args),
        Command::Julia(args) => cmd_julia(args),
        Command::Zoom(args) => cmd_zoom(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn with_max_iterations(
    config: RenderConfig,
    max_iterations: Option<u32>,
) -> anyhow::Result<RenderConfig> {
    Ok(match max_iterations {
        Some(max_iterations) => config.with_max_iterations(max_iterations)?,
        None => config,
    })
}

fn render_to_file(config: &RenderConfig, out: &Path) -> anyhow::Result<()> {
    let board = render(config).context("render board")?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let mut file =
        fs::File::create(out).with_context(|| format!("create '{}'", out.display()))?;
    write_ppm(&board, &mut file).with_context(|| format!("write ppm '{}'", out.display()))?;

    tracing::info!(path = %out.display(), "wrote image");
    Ok(())
}

fn cmd_mandelbrot(args: MandelbrotArgs) -> anyhow::Result<()> {
    let center = ComplexPoint::new(args.center_real, args.center_imag);
    let config = RenderConfig::mandelbrot(args.dimension, args.zoom, center)?;
    let config = with_max_iterations(config, args.max_iterations)?;

    render_to_file(&config, &args.out)
}

fn cmd_julia(args: JuliaArgs) -> anyhow::Result<()> {
    let config = RenderConfig::julia(args.dimension, ComplexPoint::new(args.real, args.imag))?;
    let config = with_max_iterations(config, args.max_iterations)?;

    render_to_file(&config, &args.out)
}

fn cmd_zoom(args: ZoomArgs) -> anyhow::Result<()> {
    let sequence = ZoomSequence {
        dimension: args.dimension,
        start_zoom: args.start,
        end_zoom: args.end,
        step: args.step,
        center: ComplexPoint::new(args.center_real, args.center_imag),
        max_iterations: args.max_iterations,
    };

    let frames = sequence.frames()?;
    render_frames(&frames, args.dir, args.gif.as_deref(), "zoom sequence")
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let sweep = JuliaSweep {
        dimension: args.dimension,
        frames: args.frames,
        step: args.step,
        max_iterations: args.max_iterations,
    };

    let frames = sweep.frames()?;
    render_frames(&frames, args.dir, args.gif.as_deref(), "julia sweep")
}

fn render_frames(
    frames: &[Frame],
    dir: PathBuf,
    gif: Option<&Path>,
    label: &str,
) -> anyhow::Result<()> {
    let mut sink = DirectorySink::new(dir);

    let Some(gif) = gif else {
        run_sequence(frames, &mut sink, &NeverCancel)
            .with_context(|| format!("{label} into '{}'", sink.directory().display()))?;
        return Ok(());
    };

    let grey_frames = run_animation(frames, &mut sink, &NeverCancel)
        .with_context(|| format!("{label} into '{}'", sink.directory().display()))?;

    if let Some(parent) = gif.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let file = fs::File::create(gif).with_context(|| format!("create '{}'", gif.display()))?;
    let mut out = BufWriter::new(file);
    let written = write_gif(&grey_frames, &mut out)
        .with_context(|| format!("write gif '{}'", gif.display()))?;
    out.flush()
        .with_context(|| format!("flush gif '{}'", gif.display()))?;

    tracing::info!(path = %gif.display(), frames = written, "wrote animation");
    Ok(())
}
