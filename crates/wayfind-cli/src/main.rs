mod check_cmd;
mod config;
mod explain_cmd;
mod plan_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::WayfindConfig;

#[derive(Parser)]
#[command(name = "wayfind", about = "PDDL planning task runner")]
struct Cli {
    /// Planner launcher (overrides the FAST_DOWNWARD_PATH env var)
    #[arg(long, global = true)]
    planner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a wayfind config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run a planning task and print the result map as JSON
    Plan {
        /// Path to a task JSON file
        task: Option<PathBuf>,
        /// Domain file (overrides the task file)
        #[arg(long)]
        domain: Option<PathBuf>,
        /// Problem file (overrides the task file)
        #[arg(long)]
        problem: Option<PathBuf>,
        /// Output directory (defaults to ./output)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Translate a plan trace into a plain-English explanation
    Explain {
        /// Plan trace file
        plan: PathBuf,
        /// Write the explanation to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate the configuration and report what is missing
    Check,
}

/// Execute the `wayfind init` command: write the config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::with_defaults();
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!(
        "  planner.launcher = {}",
        wayfind_core::config::DEFAULT_LAUNCHER
    );
    println!(
        "  planner.search_algorithm = {}",
        wayfind_core::config::DEFAULT_SEARCH_ALGORITHM
    );
    println!();
    println!("Next: point planner.launcher (or FAST_DOWNWARD_PATH) at your Fast Downward checkout, then run `wayfind check`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `wayfind plan` can keep stdout as the JSON
    // result channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Plan {
            task,
            domain,
            problem,
            output,
        } => {
            let resolved = WayfindConfig::resolve(cli.planner.as_deref())?;
            plan_cmd::run_plan(&resolved, task.as_deref(), domain, problem, output).await?;
        }
        Commands::Explain { plan, output } => {
            explain_cmd::run_explain(&plan, output.as_deref())?;
        }
        Commands::Check => {
            let resolved = WayfindConfig::resolve(cli.planner.as_deref())?;
            check_cmd::run_check(&resolved);
        }
    }

    Ok(())
}
