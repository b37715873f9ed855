use std::{borrow::Cow, fmt};

use serde::Deserialize;

use crate::error::CommandError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    PaperEmbedder,
    CitationRanker,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::PaperEmbedder => "paper_embedder",
            ModelKind::CitationRanker => "citation_ranker",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search budget handed to the hyperopt driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hyperparams {
    pub use_nn_negatives: bool,
    pub max_evals_initial: u32,
    pub max_evals_secondary: u32,
    pub total_samples_initial: u64,
    pub total_samples_secondary: u64,
    pub samples_per_epoch: u64,
    pub n_eval: u32,
}

impl Hyperparams {
    /// Number of epochs the trainer runs to consume `total_samples`.
    ///
    /// The trainer clamps the epoch size to the sample total, so a budget smaller
    /// than one epoch still runs a single (short) epoch.
    pub fn epochs(&self, total_samples: u64) -> u64 {
        let per_epoch = self.samples_per_epoch.min(total_samples);
        if per_epoch == 0 {
            return 0;
        }
        total_samples.div_ceil(per_epoch)
    }

    pub fn epochs_initial(&self) -> u64 {
        self.epochs(self.total_samples_initial)
    }

    pub fn epochs_secondary(&self) -> u64 {
        self.epochs(self.total_samples_secondary)
    }
}

pub const DEFAULT_HYPERPARAMS: Hyperparams = Hyperparams {
    use_nn_negatives: true,
    max_evals_initial: 75,
    max_evals_secondary: 10,
    total_samples_initial: 5_000_000,
    total_samples_secondary: 50_000_000,
    samples_per_epoch: 1_000_000,
    n_eval: 500,
};

impl Default for Hyperparams {
    fn default() -> Self {
        DEFAULT_HYPERPARAMS
    }
}

/// Render a flag the way the python argument parser expects it.
pub fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[derive(Clone, Debug)]
pub struct CmdConfig<'a> {
    pub python: Cow<'a, str>,
    pub train_script: Cow<'a, str>,
    pub dataset: Cow<'a, str>,
    pub params: Hyperparams,
    pub model: ModelKind,
    pub models_dir_base: Cow<'a, str>,
    pub version: Cow<'a, str>,
    pub log_dir: Cow<'a, str>,
    pub extra_args: Cow<'a, str>,
}

impl<'a> CmdConfig<'a> {
    pub fn with_python<T: Into<Cow<'a, str>>>(mut self, python: T) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_train_script<T: Into<Cow<'a, str>>>(mut self, train_script: T) -> Self {
        self.train_script = train_script.into();
        self
    }

    pub fn with_dataset<T: Into<Cow<'a, str>>>(mut self, dataset: T) -> Self {
        self.dataset = dataset.into();
        self
    }

    pub fn with_params(mut self, params: Hyperparams) -> Self {
        self.params = params;
        self
    }

    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    pub fn with_models_dir_base<T: Into<Cow<'a, str>>>(mut self, base: T) -> Self {
        self.models_dir_base = base.into();
        self
    }

    pub fn with_version<T: Into<Cow<'a, str>>>(mut self, version: T) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_log_dir<T: Into<Cow<'a, str>>>(mut self, log_dir: T) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn with_extra_args<T: Into<Cow<'a, str>>>(mut self, extra_args: T) -> Self {
        self.extra_args = extra_args.into();
        self
    }

    // Plain concatenation: a trailing slash on the base is kept as written.
    pub fn models_dir(&self) -> String {
        format!("{}/hyperopts/{}", self.models_dir_base, self.dataset)
    }

    pub fn log_path(&self) -> String {
        format!("{}/{}.hyperopt.log", self.log_dir, self.dataset)
    }
}

pub const DEFAULT_CONFIG: CmdConfig<'static> = CmdConfig {
    python: Cow::Borrowed("python"),
    train_script: Cow::Borrowed("citeomatic/scripts/train.py"),
    dataset: Cow::Borrowed(""),
    params: DEFAULT_HYPERPARAMS,
    model: ModelKind::PaperEmbedder,
    models_dir_base: Cow::Borrowed("/net/nfs.corp/s2-research/citeomatic/naacl2017/"),
    version: Cow::Borrowed("3a2ab1173686f91a1a657d4361c1874255ea6baf"),
    log_dir: Cow::Borrowed("/tmp"),
    extra_args: Cow::Borrowed(""),
};

impl Default for CmdConfig<'_> {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

/// Reject a blank dataset identifier. Only used when the caller opts into strict mode.
pub fn validate_dataset(dataset: &str) -> Result<(), CommandError> {
    if dataset.trim().is_empty() {
        return Err(CommandError::InvalidArgument(
            "dataset identifier is empty".to_string(),
        ));
    }
    Ok(())
}
