use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::CommandError;
use crate::hyperopt_commands::builder::DEFAULT_HYPEROPT_TEMPLATE;
use crate::hyperopt_commands::common::{CmdConfig, Hyperparams, ModelKind, DEFAULT_CONFIG};

pub const DEFAULT_CONFIG_NAME: &str = "citeomatic-tools.toml";
pub const CONFIG_ENV_VAR: &str = "CITEOMATIC_TOOLS_CONFIG";

#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    pub python: String,
    pub train_script: String,
    pub models_dir_base: String,
    pub log_dir: String,
    pub version: String,
    pub model: ModelKind,
    pub extra_args: String,
    pub hyperopt_template: String,
    pub params: Hyperparams,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            python: DEFAULT_CONFIG.python.to_string(),
            train_script: DEFAULT_CONFIG.train_script.to_string(),
            models_dir_base: DEFAULT_CONFIG.models_dir_base.to_string(),
            log_dir: DEFAULT_CONFIG.log_dir.to_string(),
            version: DEFAULT_CONFIG.version.to_string(),
            model: DEFAULT_CONFIG.model,
            extra_args: DEFAULT_CONFIG.extra_args.to_string(),
            hyperopt_template: DEFAULT_HYPEROPT_TEMPLATE.to_string(),
            params: DEFAULT_CONFIG.params,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ToolConfigFile {
    python: Option<String>,
    train_script: Option<String>,
    models_dir_base: Option<String>,
    log_dir: Option<String>,
    version: Option<String>,
    model: Option<ModelKind>,
    extra_args: Option<String>,
    hyperopt: Option<HyperoptSection>,
}

#[derive(Debug, Deserialize, Default)]
struct HyperoptSection {
    template: Option<String>,
    use_nn_negatives: Option<bool>,
    max_evals_initial: Option<u32>,
    max_evals_secondary: Option<u32>,
    total_samples_initial: Option<u64>,
    total_samples_secondary: Option<u64>,
    samples_per_epoch: Option<u64>,
    n_eval: Option<u32>,
}

impl ToolConfig {
    /// Load from `$CITEOMATIC_TOOLS_CONFIG` or `./citeomatic-tools.toml`, falling back to
    /// defaults when the file is absent or broken.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME));
        let cfg = if path.exists() {
            Self::from_path(&path).unwrap_or_else(|err| {
                warn!("tools config: {err}; using defaults");
                Self::default()
            })
        } else {
            debug!(path = %path.display(), "tools config not found; using defaults");
            Self::default()
        };
        cfg.warn_if_invalid();
        cfg
    }

    pub fn from_path(path: &Path) -> Result<Self, CommandError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CommandError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| CommandError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        let file: ToolConfigFile = toml::from_str(raw)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: ToolConfigFile) -> Self {
        let defaults = Self::default();
        let hyperopt = file.hyperopt.unwrap_or_default();
        let base = defaults.params;
        let params = Hyperparams {
            use_nn_negatives: hyperopt.use_nn_negatives.unwrap_or(base.use_nn_negatives),
            max_evals_initial: hyperopt.max_evals_initial.unwrap_or(base.max_evals_initial),
            max_evals_secondary: hyperopt
                .max_evals_secondary
                .unwrap_or(base.max_evals_secondary),
            total_samples_initial: hyperopt
                .total_samples_initial
                .unwrap_or(base.total_samples_initial),
            total_samples_secondary: hyperopt
                .total_samples_secondary
                .unwrap_or(base.total_samples_secondary),
            samples_per_epoch: hyperopt.samples_per_epoch.unwrap_or(base.samples_per_epoch),
            n_eval: hyperopt.n_eval.unwrap_or(base.n_eval),
        };

        ToolConfig {
            python: file.python.unwrap_or(defaults.python),
            train_script: file
                .train_script
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.train_script),
            models_dir_base: file
                .models_dir_base
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.models_dir_base),
            log_dir: file
                .log_dir
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.log_dir),
            version: file.version.unwrap_or(defaults.version),
            model: file.model.unwrap_or(defaults.model),
            extra_args: file.extra_args.unwrap_or(defaults.extra_args),
            hyperopt_template: hyperopt.template.unwrap_or(defaults.hyperopt_template),
            params,
        }
    }

    /// Borrowing view used by the command builder; the dataset is left empty.
    pub fn cmd_config(&self) -> CmdConfig<'_> {
        CmdConfig::default()
            .with_python(self.python.as_str())
            .with_train_script(self.train_script.as_str())
            .with_params(self.params)
            .with_model(self.model)
            .with_models_dir_base(self.models_dir_base.as_str())
            .with_version(self.version.as_str())
            .with_log_dir(self.log_dir.as_str())
            .with_extra_args(self.extra_args.as_str())
    }

    pub fn warn_if_invalid(&self) {
        if self.hyperopt_template.trim().is_empty() {
            warn!("tools config: hyperopt.template is empty; the legacy command will be printed");
        }
        if self.params.samples_per_epoch == 0 {
            warn!("tools config: hyperopt.samples_per_epoch is 0; the trainer will not run any epoch");
        }
        if self.version.trim().is_empty() {
            warn!("tools config: version is empty; runs will not be traceable to a commit");
        }
        if self.python.trim().is_empty() {
            warn!("tools config: python is empty; the printed command cannot be launched");
        }
    }
}

// Kept as a string: PathBuf would drop the trailing separator that the models dir relies on.
fn expand_path(raw: &str) -> String {
    let mut out = raw.to_string();
    if let Some(stripped) = out.strip_prefix('~') {
        if let Ok(home) = std::env::var("HOME") {
            out = format!("{home}{stripped}");
        }
    }
    expand_env(&out)
}

fn expand_env(input: &str) -> String {
    let mut out = String::new();
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match std::env::var(key) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => out.push_str(&format!("${{{}}}", key)),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
