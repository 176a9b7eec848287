//! APITest - contract test runner entry point
//!
//! Exit codes: 0 when every executed case passed, 1 when any case failed,
//! 2 when the run could not start (configuration or setup error) or the
//! result file could not be written after a passing run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use apitest_common::config::DEFAULT_CONFIG_PATH;
use apitest_common::EnvironmentConfig;
use apitest_contract::output::{self, OutputFormat};
use apitest_contract::runner::RunReport;
use apitest_contract::{suites, Suite, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "apitest")]
#[command(author, version, about = "Contract tests for the posts and comments resources")]
struct Args {
    /// Target environment (dev, test, prod)
    #[arg(short, long, env = "APITEST_ENV", default_value = "test")]
    env: String,

    /// Endpoint file with devUrl/testUrl/prodUrl (.toml or .properties)
    #[arg(short, long, env = "APITEST_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Run only these suites (posts, comments)
    #[arg(short, long)]
    suite: Vec<String>,

    /// Run only this case, plus the cases it depends on
    #[arg(short, long)]
    name: Option<String>,

    /// Per-request timeout in seconds (overrides the endpoint file)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let setup = setup(&args);
    let (runner, suites) = match setup {
        Ok(ready) => ready,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(2);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    let outcome = rt.block_on(run(&args, &runner, &suites));
    let written = match &outcome {
        Ok(report) => match runner.write_results(report) {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to write results: {}", e);
                false
            }
        },
        Err(e) => {
            error!("{:#}", e);
            false
        }
    };

    std::process::exit(exit_code(&outcome, written));
}

/// Failed cases decide the exit code ahead of a result-file error
fn exit_code(run: &anyhow::Result<RunReport>, results_written: bool) -> i32 {
    match run {
        Ok(report) if !report.success() => 1,
        Ok(_) if results_written => 0,
        _ => 2,
    }
}

/// Resolve configuration and pick suites; nothing is sent yet
fn setup(args: &Args) -> anyhow::Result<(TestRunner, Vec<Suite>)> {
    let mut config = EnvironmentConfig::load(&args.env, &args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(secs) = args.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    let suites = if args.suite.is_empty() {
        suites::all()
    } else {
        let mut picked = Vec::with_capacity(args.suite.len());
        for name in &args.suite {
            match suites::by_name(name) {
                Some(suite) => picked.push(suite),
                None => bail!("unknown suite '{}' (expected posts or comments)", name),
            }
        }
        picked
    };

    let runner = TestRunner::new(config).with_output_dir(&args.output);
    Ok((runner, suites))
}

async fn run(args: &Args, runner: &TestRunner, suites: &[Suite]) -> anyhow::Result<RunReport> {
    let report = match &args.name {
        Some(name) => runner.run_named(suites, name).await?,
        None => runner.run_all(suites).await?,
    };

    output::print_report(&report, args.format)?;
    Ok(report)
}
