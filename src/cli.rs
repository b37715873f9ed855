use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::config::ToolConfig;
use crate::hyperopt_commands::builder::Shell;
use crate::hyperopt_commands::common::ModelKind;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShellArg {
    Ps,
    Sh,
}

impl From<ShellArg> for Shell {
    fn from(value: ShellArg) -> Self {
        match value {
            ShellArg::Ps => Shell::PowerShell,
            ShellArg::Sh => Shell::Bash,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModelArg {
    #[value(name = "paper_embedder", alias = "paper-embedder")]
    PaperEmbedder,
    #[value(name = "citation_ranker", alias = "citation-ranker")]
    CitationRanker,
}

impl From<ModelArg> for ModelKind {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::PaperEmbedder => ModelKind::PaperEmbedder,
            ModelArg::CitationRanker => ModelKind::CitationRanker,
        }
    }
}

/// Hyperparameter overrides; anything left unset keeps the config value.
#[derive(Debug, Clone, Default, Args)]
pub struct HyperparamArgs {
    #[arg(long, help = "Mine nearest-neighbour negatives (True/False in the output)")]
    pub use_nn_negatives: Option<bool>,
    #[arg(long, help = "Evaluations in the initial search phase")]
    pub max_evals_initial: Option<u32>,
    #[arg(long, help = "Evaluations in the secondary search phase")]
    pub max_evals_secondary: Option<u32>,
    #[arg(long, help = "Training samples per initial trial")]
    pub total_samples_initial: Option<u64>,
    #[arg(long, help = "Training samples per secondary trial")]
    pub total_samples_secondary: Option<u64>,
    #[arg(long, help = "Samples per training epoch")]
    pub samples_per_epoch: Option<u64>,
    #[arg(long, help = "Query documents used for evaluation")]
    pub n_eval: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "hyperopt_cmd",
    author,
    version,
    about = "Print citeomatic hyperopt training commands"
)]
pub struct Cli {
    /// Dataset identifiers (dblp, pubmed, oc, ...). One command is printed per dataset.
    pub datasets: Vec<String>,

    #[arg(long, help = "Path to a citeomatic-tools.toml config")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value = "sh",
        help = "Shell to target (ps|sh)"
    )]
    pub shell: ShellArg,

    #[arg(long, value_enum, help = "Model to optimise")]
    pub model: Option<ModelArg>,

    #[arg(long, help = "Code version recorded with the run")]
    pub version_id: Option<String>,

    #[arg(long, help = "Base directory that holds hyperopts/<dataset>")]
    pub models_dir_base: Option<String>,

    #[arg(long, help = "Directory for the redirected job log")]
    pub log_dir: Option<String>,

    #[arg(long, help = "Python interpreter")]
    pub python: Option<String>,

    #[arg(long, help = "Training entry point")]
    pub train_script: Option<String>,

    #[arg(long, help = "Extra args appended to the training command")]
    pub extra_args: Option<String>,

    #[command(flatten)]
    pub params: HyperparamArgs,

    #[arg(long, default_value_t = false, help = "Fail on an empty dataset identifier")]
    pub strict: bool,

    #[arg(long, default_value = "warn", help = "Log verbosity (trace, debug, info, warn, error)")]
    pub log_level: tracing::Level,
}

impl Cli {
    /// Datasets to render; none given behaves like a single empty identifier.
    pub fn datasets(&self) -> Vec<&str> {
        if self.datasets.is_empty() {
            vec![""]
        } else {
            self.datasets.iter().map(String::as_str).collect()
        }
    }

    /// Layer command line overrides on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut ToolConfig) {
        if let Some(model) = self.model {
            cfg.model = model.into();
        }
        if let Some(version) = &self.version_id {
            cfg.version = version.clone();
        }
        if let Some(base) = &self.models_dir_base {
            cfg.models_dir_base = base.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            cfg.log_dir = log_dir.clone();
        }
        if let Some(python) = &self.python {
            cfg.python = python.clone();
        }
        if let Some(script) = &self.train_script {
            cfg.train_script = script.clone();
        }
        if let Some(extra) = &self.extra_args {
            cfg.extra_args = extra.clone();
        }

        let p = &self.params;
        let params = &mut cfg.params;
        if let Some(v) = p.use_nn_negatives {
            params.use_nn_negatives = v;
        }
        if let Some(v) = p.max_evals_initial {
            params.max_evals_initial = v;
        }
        if let Some(v) = p.max_evals_secondary {
            params.max_evals_secondary = v;
        }
        if let Some(v) = p.total_samples_initial {
            params.total_samples_initial = v;
        }
        if let Some(v) = p.total_samples_secondary {
            params.total_samples_secondary = v;
        }
        if let Some(v) = p.samples_per_epoch {
            params.samples_per_epoch = v;
        }
        if let Some(v) = p.n_eval {
            params.n_eval = v;
        }
    }
}
