mod report;
mod theme;

use anyhow::{Context, Result};
use clap::Parser;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use charm_core::{
    read_catalog, Ability, Algorithm, Charm, Config, EvalResult, PruneReport, PruneTracer,
};

use report::Report;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "charm", version)]
#[command(about = "Find the best charm set for a power budget")]
struct Args {
    /// Charm catalog file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Weight config file (defaults to <config dir>/charm/config.ini when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured charm power budget
    #[arg(long, value_name = "N")]
    charm_power: Option<u32>,

    /// Override a single weight, e.g. `-w melee_damage=3`
    #[arg(short = 'w', long = "weight", value_name = "ID=N", value_parser = parse_weight)]
    weights: Vec<(Ability, i32)>,

    /// Evaluation algorithm
    #[arg(long, default_value = "naive")]
    algo: Algorithm,

    /// Worker threads (defaults to available parallelism)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Print what the reducer kept before searching
    #[arg(long)]
    trace: bool,

    /// Time N evaluations and print mean/stddev
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    benchmark: Option<u32>,

    /// Machine-readable output without colors
    #[arg(long, conflicts_with = "benchmark")]
    bot_mode: bool,

    /// Print the result as JSON
    #[arg(long, conflicts_with_all = ["benchmark", "bot_mode"])]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Parse `ID=N` into an ability and its weight.
fn parse_weight(s: &str) -> Result<(Ability, i32), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=N, got '{}'", s))?;
    let ability =
        Ability::from_id(id.trim()).ok_or_else(|| format!("unknown charm effect '{}'", id.trim()))?;
    let weight = value
        .trim()
        .parse()
        .map_err(|_| format!("failed to parse '{}' as int", value.trim()))?;
    Ok((ability, weight))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("charm").join("config.ini"))
}

/// Config file layered with command line overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::default();

    match &args.config {
        Some(path) => config
            .merge_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                config
                    .merge_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?;
            } else {
                tracing::debug!("no config file, using defaults");
            }
        }
    }

    if let Some(power) = args.charm_power {
        config.set_max_power(power)?;
    }
    for (ability, weight) in &args.weights {
        config.set_weight(*ability, *weight);
    }
    Ok(config)
}

fn configure_algorithm(args: &Args) -> Algorithm {
    let mut algo = args.algo;
    match &mut algo {
        Algorithm::Naive(opts) => {
            if let Some(threads) = args.threads {
                opts.threads = threads;
            }
            opts.trace = args.trace;
        }
    }
    algo
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;
    let charms = read_catalog(&args.input)
        .with_context(|| format!("loading charms from {}", args.input.display()))?;
    let algo = configure_algorithm(&args);
    tracing::debug!(charms = charms.len(), algo = %algo, threads = algo.threads(), "starting");

    let stdout = io::stdout();
    if args.json {
        let result = evaluate(&algo, &charms, &config, None);
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else if args.bot_mode {
        let mut report = Report::new(stdout.lock(), Theme::plain());
        let result = evaluate(&algo, &charms, &config, None);
        report.bot(&result, &charms, &config)?;
        report.flush()?;
    } else if let Some(runs) = args.benchmark {
        let mut report = Report::new(stdout.lock(), Theme::default());
        // warm-up
        evaluate(&algo, &charms, &config, None);

        let mut samples = Vec::with_capacity(runs as usize);
        for run in 0..runs as usize {
            let start = Instant::now();
            evaluate(&algo, &charms, &config, None);
            let nanos = start.elapsed().as_secs_f64() * 1e9;
            samples.push(nanos);
            report.benchmark_run(run, nanos)?;
        }
        report.benchmark_summary(&samples)?;
        report.flush()?;
    } else {
        let mut report = Report::new(stdout.lock(), Theme::default());
        report.banner()?;
        report.config(&config)?;
        report.catalog(&charms)?;
        report.algorithm(&algo)?;
        report.flush()?;

        let trace_report = RefCell::new(Report::new(io::stdout(), Theme::default()));
        let tracer = |pruned: &PruneReport<'_>| {
            if let Err(e) = trace_report.borrow_mut().trace(pruned) {
                tracing::warn!("failed to print trace: {}", e);
            }
        };

        let start = Instant::now();
        let result = evaluate(&algo, &charms, &config, Some(&tracer));
        report.elapsed(start.elapsed())?;
        report.result(&result, &charms, &config)?;
        report.flush()?;
    }

    Ok(())
}

fn evaluate(
    algo: &Algorithm,
    charms: &[Charm],
    config: &Config,
    tracer: Option<PruneTracer<'_>>,
) -> EvalResult {
    algo.run(charms, config.max_power, config.to_weights(), tracer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("armor=3"), Ok((Ability::Armor, 3)));
        assert_eq!(
            parse_weight(" ability_cooldown = -2 "),
            Ok((Ability::AbilityCooldown, -2))
        );
        assert!(parse_weight("armor").is_err());
        assert!(parse_weight("luck=1").is_err());
        assert!(parse_weight("armor=lots").is_err());
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "charm",
            "-i",
            "charms.txt",
            "--charm-power",
            "9",
            "-w",
            "armor=2",
            "--weight",
            "speed=-1",
            "--threads",
            "3",
            "--trace",
        ])
        .unwrap();

        assert_eq!(args.weights, vec![(Ability::Armor, 2), (Ability::Speed, -1)]);

        let mut config = Config::default();
        config.set_max_power(args.charm_power.unwrap()).unwrap();
        for (ability, weight) in &args.weights {
            config.set_weight(*ability, *weight);
        }
        assert_eq!(config.max_power, 9);

        let Algorithm::Naive(opts) = configure_algorithm(&args);
        assert_eq!(opts.threads, 3);
        assert!(opts.trace);
    }

    #[test]
    fn test_args_rejects_bad_values() {
        assert!(Args::try_parse_from(["charm"]).is_err());
        assert!(Args::try_parse_from(["charm", "-i", "c.txt", "--algo", "greedy"]).is_err());
        assert!(Args::try_parse_from(["charm", "-i", "c.txt", "--benchmark", "0"]).is_err());
        assert!(Args::try_parse_from([
            "charm",
            "-i",
            "c.txt",
            "--benchmark",
            "2",
            "--bot-mode"
        ])
        .is_err());
    }

    #[test]
    fn test_power_override_checked() {
        let args = Args::try_parse_from([
            "charm",
            "-i",
            "c.txt",
            "-c",
            "/definitely/not/here.ini",
        ])
        .unwrap();
        assert!(load_config(&args).is_err());

        let mut config = Config::default();
        assert!(config.set_max_power(16).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
