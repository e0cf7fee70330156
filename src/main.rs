use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use flock::output::{Format, write_positions};
use flock::{Flock, Parameters, Visibility, ZeroDistance};

const WIDTH: f64 = 1920.0;
const HEIGHT: f64 = 1080.0;
const MAX_SPEED: f64 = 3.0;

#[derive(FromArgs)]
/// Run a flock of boids and print every boid's position after each step.
struct Args {
    /// number of steps to simulate
    #[argh(option, default = "100")]
    steps: u64,

    /// JSON file with the initial boids
    #[argh(option)]
    input: Option<PathBuf>,

    /// scatter this many boids at random instead of reading --input
    #[argh(option)]
    random: Option<usize>,

    /// seed for --random
    #[argh(option, default = "0")]
    seed: u64,

    /// JSON file with rule parameters
    #[argh(option)]
    params: Option<PathBuf>,

    /// read the flock as it was at the start of each step
    #[argh(switch)]
    snapshot: bool,

    /// coincident neighbors in the separate rule: skip, zero or propagate
    #[argh(option, from_str_fn(parse_zero_distance))]
    zero_distance: Option<ZeroDistance>,

    /// output format: text or json
    #[argh(option, default = "Format::Text")]
    format: Format,

    /// show a progress bar on stderr
    #[argh(switch)]
    progress: bool,
}

fn parse_zero_distance(value: &str) -> Result<ZeroDistance, String> {
    match value {
        "skip" => Ok(ZeroDistance::Skip),
        "zero" => Ok(ZeroDistance::ZeroVector),
        "propagate" => Ok(ZeroDistance::Propagate),
        other => Err(format!(
            "unknown policy `{other}`, expected `skip`, `zero` or `propagate`"
        )),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_params(args: &Args) -> Result<Parameters> {
    let mut params = match &args.params {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Parameters::from_json_reader(BufReader::new(file))
                .with_context(|| format!("failed to read parameters from {}", path.display()))?
        }
        None => Parameters::default(),
    };
    if args.snapshot {
        params.visibility = Visibility::Snapshot;
    }
    if let Some(policy) = args.zero_distance {
        params.zero_distance = policy;
    }
    Ok(params)
}

fn load_flock(args: &Args) -> Result<Flock> {
    match (&args.input, args.random) {
        (Some(_), Some(_)) => anyhow::bail!("--input and --random cannot be combined"),
        (Some(path), None) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Flock::from_json_reader(BufReader::new(file))
                .with_context(|| format!("failed to read boids from {}", path.display()))
        }
        (None, Some(count)) => Ok(Flock::scatter(count, WIDTH, HEIGHT, MAX_SPEED, args.seed)),
        (None, None) => Ok(Flock::reference()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args: Args = argh::from_env();

    let params = load_params(&args)?;
    let mut flock = load_flock(&args)?;
    info!(boids = flock.len(), ?params, "loaded flock");

    let pbar = if args.progress {
        let pbar = ProgressBar::new(args.steps);
        pbar.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}/{eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
            )
            .context("invalid progress template")?,
        );
        pbar
    } else {
        ProgressBar::hidden()
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    flock
        .run(args.steps, &params, |flock| {
            write_positions(&mut out, flock, args.format)?;
            pbar.inc(1);
            Ok(())
        })
        .context("simulation failed")?;
    out.flush().context("failed to flush output")?;
    pbar.finish_and_clear();
    Ok(())
}
