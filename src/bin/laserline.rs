use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use laserline::{
    CompileConfig, CompileOpts, CompileReport, CompileSession, ContainerFormat, FrameSource,
    LayeredSource, Palette, RasterSource, VectorSource,
};

#[derive(Parser, Debug)]
#[command(name = "laserline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace a directory of edge-mask images (`frame_*.png`, else `*.png`).
    Raster(RasterArgs),
    /// Trace colored mask layers listed in a JSON manifest.
    Layers(LayersArgs),
    /// Sample a directory of SVG frames (`frame_*.svg`, else `*.svg`).
    Vector(VectorArgs),
    /// Summarize an existing container file.
    Inspect(InspectArgs),
    /// Rasterize one frame of a container to PNG.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct RasterArgs {
    /// Directory of mask images.
    #[arg(long = "in")]
    in_dir: PathBuf,

    #[command(flatten)]
    compile: CompileArgs,
}

#[derive(Args, Debug)]
struct LayersArgs {
    /// Layer manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    #[command(flatten)]
    compile: CompileArgs,
}

#[derive(Args, Debug)]
struct VectorArgs {
    /// Directory of SVG frames.
    #[arg(long = "in")]
    in_dir: PathBuf,

    #[command(flatten)]
    compile: CompileArgs,
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Output container path.
    #[arg(long)]
    out: PathBuf,

    /// Compile configuration JSON. Applied before flag overrides.
    #[arg(long, conflicts_with = "profile")]
    config: Option<PathBuf>,

    /// Named preset (classic, arcade, la_linea).
    #[arg(long)]
    profile: Option<String>,

    #[arg(long)]
    fps: Option<f64>,

    /// Scanner rate in thousands of points per second.
    #[arg(long)]
    kpps: Option<u32>,

    /// Fixed per-frame point ceiling.
    #[arg(long)]
    max_points: Option<u32>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Sample polyline colors from the source image.
    #[arg(long)]
    sample_color: bool,

    /// Process frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Container file.
    path: PathBuf,

    /// Print one line per frame.
    #[arg(long)]
    frames: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Container file.
    path: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Palette for indexed frames when the file embeds none (standard, white63).
    #[arg(long, default_value = "standard")]
    palette: String,

    #[arg(long, default_value_t = 512)]
    width: u32,

    #[arg(long, default_value_t = 512)]
    height: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Indexed3d,
    Indexed2d,
    Truecolor3d,
    Truecolor2d,
}

impl From<FormatArg> for ContainerFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Indexed3d => ContainerFormat::Indexed3d,
            FormatArg::Indexed2d => ContainerFormat::Indexed2d,
            FormatArg::Truecolor3d => ContainerFormat::Truecolor3d,
            FormatArg::Truecolor2d => ContainerFormat::Truecolor2d,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);
    match cli.cmd {
        Command::Raster(args) => {
            let source = RasterSource::from_dir(&args.in_dir)
                .with_context(|| format!("list masks in '{}'", args.in_dir.display()))?;
            run_compile(&source, &args.compile)
        }
        Command::Layers(args) => {
            let source = LayeredSource::from_manifest(&args.manifest)
                .with_context(|| format!("load manifest '{}'", args.manifest.display()))?;
            run_compile(&source, &args.compile)
        }
        Command::Vector(args) => {
            let source = VectorSource::from_dir(&args.in_dir)
                .with_context(|| format!("list svg frames in '{}'", args.in_dir.display()))?;
            run_compile(&source, &args.compile)
        }
        Command::Inspect(args) => cmd_inspect(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_logging(level: &str, json: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

fn build_config(args: &CompileArgs) -> anyhow::Result<CompileConfig> {
    let mut cfg = match (&args.config, &args.profile) {
        (Some(path), _) => CompileConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        (None, Some(name)) => CompileConfig::profile(name),
        (None, None) => CompileConfig::default(),
    };
    if let Some(fps) = args.fps {
        cfg.budget.fps = fps;
    }
    if let Some(kpps) = args.kpps {
        cfg.budget.kpps = kpps;
    }
    if args.max_points.is_some() {
        cfg.budget.max_points_override = args.max_points;
    }
    if let Some(format) = args.format {
        cfg.format = format.into();
    }
    if args.sample_color {
        cfg.color.enabled = true;
    }
    cfg.validate().context("invalid compile settings")?;
    Ok(cfg)
}

fn run_compile(source: &dyn FrameSource, args: &CompileArgs) -> anyhow::Result<()> {
    let cfg = build_config(args)?;
    let opts = CompileOpts {
        parallel: args.parallel,
        threads: args.threads,
        ..CompileOpts::default()
    };
    let session = CompileSession::new(cfg, opts)?;
    let report = session
        .export(source, &args.out, &|| false)
        .with_context(|| format!("compile '{}'", args.out.display()))?;
    print_report(&report);
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn print_report(report: &CompileReport) {
    eprintln!(
        "frames={} points={} ceiling={} truncated={} dropped={} synthetic={} bytes={}",
        report.frames,
        report.total_points,
        report.ceiling,
        report.truncated_frames,
        report.dropped_points,
        report.synthetic_frames,
        report.bytes_written,
    );
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
}

fn read_file(path: &Path) -> anyhow::Result<laserline::Container> {
    let f = File::open(path).with_context(|| format!("open container '{}'", path.display()))?;
    let container = laserline::read_container(BufReader::new(f))
        .with_context(|| format!("read container '{}'", path.display()))?;
    Ok(container)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let container = read_file(&args.path)?;
    let total_points: usize = container.frames.iter().map(|f| f.points.len()).sum();
    let max_points = container
        .frames
        .iter()
        .map(|f| f.points.len())
        .max()
        .unwrap_or(0);
    println!("file: {}", args.path.display());
    println!("frames: {}", container.frames.len());
    println!("points: {total_points} (max {max_points} per frame)");
    println!(
        "palette: {}",
        if container.palette.is_some() {
            "embedded"
        } else {
            "none"
        }
    );
    if args.frames {
        for (i, f) in container.frames.iter().enumerate() {
            let blanked = f.points.iter().filter(|p| p.is_blanked()).count();
            println!(
                "{i:5} {:8} {:?} points={} blanked={blanked}",
                f.name,
                f.format,
                f.points.len()
            );
        }
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let container = read_file(&args.path)?;
    let frame = container.frames.get(args.frame).with_context(|| {
        format!(
            "frame {} out of range ({} frames)",
            args.frame,
            container.frames.len()
        )
    })?;
    let palette = match container.palette.clone() {
        Some(p) => p,
        None => Palette::by_name(&args.palette)
            .with_context(|| format!("unknown palette '{}'", args.palette))?,
    };
    let img = laserline::render_preview(frame, &palette, args.width, args.height);

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
