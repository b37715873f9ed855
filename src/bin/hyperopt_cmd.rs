//! Prints the command line for a citeomatic hyperopt run, one per dataset.
//! Pipe the output to a shell or job queue: `hyperopt_cmd dblp | sh`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use citeomatic_tools::cli::Cli;
use citeomatic_tools::hyperopt_commands::{
    builder::{build_command_with_template, Shell},
    common::validate_dataset,
};
use citeomatic_tools::{logging, ToolConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let mut tool_cfg = match &cli.config {
        Some(path) => {
            let cfg = ToolConfig::from_path(path)
                .with_context(|| format!("load config {}", path.display()))?;
            cfg.warn_if_invalid();
            cfg
        }
        None => ToolConfig::load(),
    };
    cli.apply_overrides(&mut tool_cfg);

    let params = tool_cfg.params;
    debug!(
        epochs_initial = params.epochs_initial(),
        epochs_secondary = params.epochs_secondary(),
        max_evals_initial = params.max_evals_initial,
        max_evals_secondary = params.max_evals_secondary,
        "hyperopt schedule"
    );

    let shell: Shell = cli.shell.into();
    for dataset in cli.datasets() {
        if cli.strict {
            validate_dataset(dataset)?;
        } else if dataset.trim().is_empty() {
            warn!("dataset identifier is empty; printing command with empty substitutions");
        }
        let cfg = tool_cfg.cmd_config().with_dataset(dataset);
        let cmd = build_command_with_template(&cfg, shell, &tool_cfg.hyperopt_template);
        info!(dataset, log = %cfg.log_path(), "generated hyperopt command");
        println!("{cmd}");
    }
    Ok(())
}
