use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use chartbridge::{
    ChartRequest, EnvironmentDescriptor, RenderMode, RenderResult, RenderSize, Supervisor,
    SupervisorConfig,
};

#[derive(Parser, Debug)]
#[command(name = "chartbridge", version, about = "Render charts through a supervised chart-worker")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this worker executable instead of searching for one.
    #[arg(long, global = true)]
    worker: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a request JSON file and print the image path.
    Render(RenderArgs),
    /// Resolve the worker runtime and print what was found.
    Check,
    /// Render a sum-of-sines test chart.
    Sine(SineArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Cold,
    Warm,
}

impl From<ModeChoice> for RenderMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Cold => RenderMode::Cold,
            ModeChoice::Warm => RenderMode::Warm,
        }
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = ModeChoice::Cold)]
    mode: ModeChoice,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    dpi: Option<u32>,

    /// Per-render timeout; defaults to the configured render timeout.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Pass `--fast` to the worker.
    #[arg(long)]
    fast: bool,

    /// Directory receiving the images.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Render this many times (warm mode reuses one worker).
    #[arg(long, default_value_t = 1)]
    repeat: u32,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Request JSON file.
    request: PathBuf,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct SineArgs {
    /// Frequency in Hz; repeat for several series.
    #[arg(long = "freq", required = true)]
    frequencies: Vec<f64>,

    /// Amplitude per frequency (default 1).
    #[arg(long = "amp")]
    amplitudes: Vec<f64>,

    /// Phase in radians per frequency (default 0).
    #[arg(long = "phase")]
    phases: Vec<f64>,

    #[arg(long, default_value_t = 0.0)]
    start: f64,

    #[arg(long, default_value_t = 1.0)]
    end: f64,

    #[arg(long, default_value_t = 1000)]
    points: usize,

    #[arg(long, default_value = "Sine Waves")]
    title: String,

    #[command(flatten)]
    out: OutputArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chartbridge::logging::init("info");
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SupervisorConfig::from_file(path)?,
        None => SupervisorConfig::default(),
    };

    match cli.cmd {
        Command::Check => {
            let sup = make_supervisor(config, cli.worker)?;
            let desc = sup.initialize().await?;
            println!("{}", serde_json::to_string_pretty(&desc)?);
            Ok(())
        }
        Command::Render(args) => {
            let request = ChartRequest::from_path(&args.request)?;
            apply_output_args(&mut config, &args.out);
            let sup = make_supervisor(config, cli.worker)?;
            render_all(&sup, &request, &args.out).await
        }
        Command::Sine(args) => {
            let n = args.frequencies.len();
            let amplitudes = padded(&args.amplitudes, n, 1.0);
            let phases = padded(&args.phases, n, 0.0);
            let request = chartbridge::sine_waves(
                &args.frequencies,
                &amplitudes,
                &phases,
                (args.start, args.end),
                args.points,
                args.title.clone(),
            )?;
            apply_output_args(&mut config, &args.out);
            let sup = make_supervisor(config, cli.worker)?;
            render_all(&sup, &request, &args.out).await
        }
    }
}

fn padded(values: &[f64], len: usize, fill: f64) -> Vec<f64> {
    values
        .iter()
        .copied()
        .chain(std::iter::repeat(fill))
        .take(len)
        .collect()
}

fn apply_output_args(config: &mut SupervisorConfig, out: &OutputArgs) {
    let w = &mut config.worker;
    w.fast |= out.fast;
    if let Some(dir) = &out.output_dir {
        w.output_dir = Some(dir.clone());
    }
}

fn make_supervisor(
    config: SupervisorConfig,
    worker: Option<PathBuf>,
) -> anyhow::Result<Supervisor> {
    config.validate()?;
    Ok(match worker {
        Some(path) => {
            let path = path
                .canonicalize()
                .with_context(|| format!("worker '{}' not found", path.display()))?;
            Supervisor::with_environment(config, EnvironmentDescriptor::ambient(path))
        }
        None => Supervisor::new(config),
    })
}

async fn render_all(
    sup: &Supervisor,
    request: &ChartRequest,
    out: &OutputArgs,
) -> anyhow::Result<()> {
    let w = &sup.config().worker;
    let size = RenderSize::new(
        out.width.unwrap_or(w.width),
        out.height.unwrap_or(w.height),
        out.dpi.unwrap_or(w.dpi),
    );
    let timeout = out
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| w.render_timeout());

    let mut outcome = Ok(());
    for i in 0..out.repeat.max(1) {
        match sup.render_sized(request, size, out.mode.into(), timeout).await {
            Ok(result) => report(i, &result),
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }
    sup.shutdown().await;
    Ok(outcome?)
}

fn report(index: u32, result: &RenderResult) {
    tracing::info!(
        run = index + 1,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "render finished"
    );
    for line in &result.diagnostics {
        tracing::debug!(target: "chartbridge::worker", "{line}");
    }
    println!("{}", result.image_path.display());
}
