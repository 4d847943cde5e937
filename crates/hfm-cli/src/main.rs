//! HFM CLI - run a kitchen order through the engine
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`HFM_*`)
//! 3. Project config (`.hfm/config.toml` in the project root)
//! 4. Global config (`~/.hfm/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `HFM_DEBUG`: Enable debug logging (`true`/`false`)
//! - `HFM_MAX_DEPTH`: Child program nesting limit
//! - `HFM_MAX_STEPS`: Step limit per program level (`0` = unlimited)
//! - `HFM_TRACE_COMMANDS`: Trace every dispatched command
//!
//! # Examples
//!
//! ```text
//! hfm sandwich
//! hfm pizza --maker luigi --maker mario --by mario
//! hfm random --seed 7 --maker luigi
//! hfm combo --mock
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use hfm_engine::config::{ConfigError, ConfigLoader, HfmConfig};
use hfm_engine::{CallLog, Engine, InterpreterRegistry};
use hfm_kitchen::interpreters::mock;
use hfm_kitchen::{house_choice, Kitchen, Order};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HFM CLI - run a kitchen order through the engine
#[derive(Parser, Debug)]
#[command(name = "hfm")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Named pizza maker; repeat for more
    #[arg(long = "maker", value_name = "NAME")]
    makers: Vec<String>,

    /// Who bakes the pizza (defaults to the first --maker, else the house oven)
    #[arg(long, value_name = "NAME")]
    by: Option<String>,

    /// Seed for random meals
    #[arg(long)]
    seed: Option<u64>,

    /// Dough portions per oven
    #[arg(long, value_name = "N")]
    dough_stock: Option<u32>,

    /// Use recording interpreters instead of the kitchen
    #[arg(long)]
    mock: bool,

    /// What to order: sandwich, pizza, combo or random
    order: Order,
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    skip_global: bool,
    skip_env: bool,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            skip_global: false,
            skip_env: false,
        }
    }

    fn resolve(&self) -> Result<HfmConfig, ConfigError> {
        let mut loader = ConfigLoader::new().with_project_root(&self.project_root);
        if self.skip_global {
            loader = loader.skip_global_config();
        }
        if self.skip_env {
            loader = loader.skip_env_vars();
        }

        let mut config = loader.load()?;

        // CLI args override (highest priority)
        if self.debug {
            config.debug = true;
        }

        Ok(config)
    }
}

impl Args {
    /// The pizza maker for this run: `--by`, else the first `--maker`.
    fn baker(&self) -> Option<&str> {
        self.by
            .as_deref()
            .or_else(|| self.makers.first().map(String::as_str))
    }
}

/// Interpreters for this run.
///
/// `--mock` records calls instead of cooking; its random meal is the
/// house pizza by [`Args::baker`], or the house sandwich.
fn registry(args: &Args, log: &CallLog) -> Result<InterpreterRegistry> {
    if args.mock {
        let makers: Vec<&str> = args.makers.iter().map(String::as_str).collect();
        let choice = house_choice(args.baker()).context("cannot script random meal")?;
        return Ok(mock::registry(log, &makers, Some(choice)));
    }

    let mut kitchen = Kitchen::new().with_makers(args.makers.iter().cloned());
    if let Some(seed) = args.seed {
        kitchen = kitchen.with_seed(seed);
    }
    if let Some(portions) = args.dough_stock {
        kitchen = kitchen.with_dough_stock(portions);
    }
    Ok(kitchen.registry())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    // Terminal filter: --debug / HFM_DEBUG > RUST_LOG env > default "warn"
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(path = %resolver.project_root.display(), "Project root");

    let program = args
        .order
        .program(args.baker())
        .context("cannot build order")?;

    let log = CallLog::new();
    let registry = registry(&args, &log)?;
    let engine = Engine::from_config(&config);

    info!(order = %args.order, mock = args.mock, "Running order");
    let served = engine
        .execute(program, &registry)
        .with_context(|| format!("{} order failed", args.order))?;

    println!("{served}");
    for entry in log.entries() {
        println!("  {entry}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfm_engine::FailurePolicy;

    /// Helper: resolver over a temp project root, ignoring global config and env.
    fn resolver_in(root: &std::path::Path, debug: bool) -> CliConfigResolver {
        CliConfigResolver {
            project_root: root.to_path_buf(),
            debug,
            skip_global: true,
            skip_env: true,
        }
    }

    #[test]
    fn parses_order_and_makers() {
        let args = Args::try_parse_from([
            "hfm", "pizza", "--maker", "luigi", "--maker", "mario", "--seed", "3",
        ])
        .unwrap();
        assert_eq!(args.order, Order::Pizza);
        assert_eq!(args.makers, vec!["luigi", "mario"]);
        assert_eq!(args.seed, Some(3));
        assert!(!args.mock);
        assert_eq!(args.baker(), Some("luigi"));

        let args =
            Args::try_parse_from(["hfm", "pizza", "--maker", "luigi", "--by", "mario"]).unwrap();
        assert_eq!(args.baker(), Some("mario"));
    }

    #[test]
    fn rejects_unknown_order() {
        assert!(Args::try_parse_from(["hfm", "soup"]).is_err());
    }

    #[test]
    fn debug_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolver_in(dir.path(), true).resolve().unwrap();
        assert!(config.debug);

        let config = resolver_in(dir.path(), false).resolve().unwrap();
        assert!(!config.debug);
    }

    #[test]
    fn project_config_sets_policies() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".hfm");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[policies.pizza]\nkind = \"recover\"\n",
        )
        .unwrap();

        let config = resolver_in(dir.path(), false).resolve().unwrap();
        assert_eq!(
            config.policies.get("pizza"),
            Some(&FailurePolicy::Recover)
        );
    }

    #[test]
    fn mock_registry_records_calls() {
        let args = Args::try_parse_from(["hfm", "sandwich", "--mock"]).unwrap();
        let log = CallLog::new();
        let registry = registry(&args, &log).unwrap();

        let served = Engine::new()
            .execute(args.order.program(None).unwrap(), &registry)
            .unwrap();

        assert_eq!(served.to_string(), "#1 sandwich [Cheese, Salt]");
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn mock_random_serves_house_sandwich() {
        let args = Args::try_parse_from(["hfm", "random", "--mock"]).unwrap();
        let log = CallLog::new();
        let registry = registry(&args, &log).unwrap();

        let served = Engine::new()
            .execute(args.order.program(None).unwrap(), &registry)
            .unwrap();

        assert_eq!(served.to_string(), "#1 sandwich [Cheese, Salt]");
        assert_eq!(log.entries().first().map(String::as_str), Some("machine.choose"));
    }

    #[test]
    fn mock_random_uses_first_maker() {
        let args =
            Args::try_parse_from(["hfm", "random", "--mock", "--maker", "luigi"]).unwrap();
        let log = CallLog::new();
        let registry = registry(&args, &log).unwrap();

        let served = Engine::new()
            .execute(args.order.program(None).unwrap(), &registry)
            .unwrap();

        assert_eq!(
            served.to_string(),
            "#1 medium pizza [Tomato, Mozzarella, Basil] by luigi"
        );
    }
}
