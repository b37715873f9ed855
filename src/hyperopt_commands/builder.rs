use super::common::{python_bool, CmdConfig};

pub const DEFAULT_HYPEROPT_TEMPLATE: &str = "${PYTHON} ${TRAIN_SCRIPT} --mode hyperopt --dataset_type ${DATASET} --use_nn_negatives ${USE_NN_NEGATIVES} --max_evals_initial ${MAX_EVALS_INITIAL} --max_evals_secondary ${MAX_EVALS_SECONDARY} --total_samples_initial ${TOTAL_SAMPLES_INITIAL} --total_samples_secondary ${TOTAL_SAMPLES_SECONDARY} --samples_per_epoch ${SAMPLES_PER_EPOCH} --n_eval ${N_EVAL} --model_name ${MODEL} --models_dir_base ${MODELS_DIR} --version \"${VERSION}\" ${EXTRA_ARGS} ${REDIRECT}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    PowerShell,
    Bash,
}

impl Shell {
    /// Redirect stdout and stderr of the job into `path`.
    fn redirect(&self, path: &str) -> String {
        match self {
            Shell::PowerShell => format!("*> {path}"),
            Shell::Bash => format!("&> {path}"),
        }
    }
}

pub fn build_command(cfg: &CmdConfig<'_>, shell: Shell) -> String {
    build_command_with_template(cfg, shell, DEFAULT_HYPEROPT_TEMPLATE)
}

pub fn build_command_with_template(cfg: &CmdConfig<'_>, shell: Shell, template: &str) -> String {
    let params = &cfg.params;
    let models_dir = cfg.models_dir();
    let log_path = cfg.log_path();
    let redirect = shell.redirect(&log_path);

    let cmd = render_template(
        template,
        &[
            ("PYTHON", cfg.python.as_ref()),
            ("TRAIN_SCRIPT", cfg.train_script.as_ref()),
            ("DATASET", cfg.dataset.as_ref()),
            ("USE_NN_NEGATIVES", python_bool(params.use_nn_negatives)),
            ("MAX_EVALS_INITIAL", &params.max_evals_initial.to_string()),
            ("MAX_EVALS_SECONDARY", &params.max_evals_secondary.to_string()),
            (
                "TOTAL_SAMPLES_INITIAL",
                &params.total_samples_initial.to_string(),
            ),
            (
                "TOTAL_SAMPLES_SECONDARY",
                &params.total_samples_secondary.to_string(),
            ),
            ("SAMPLES_PER_EPOCH", &params.samples_per_epoch.to_string()),
            ("N_EVAL", &params.n_eval.to_string()),
            ("MODEL", cfg.model.as_str()),
            ("MODELS_DIR_BASE", cfg.models_dir_base.as_ref()),
            ("MODELS_DIR", &models_dir),
            ("VERSION", cfg.version.as_ref()),
            ("LOG_PATH", &log_path),
            ("EXTRA_ARGS", cfg.extra_args.trim()),
            ("REDIRECT", &redirect),
        ],
    )
    .trim()
    .to_string();

    if cmd.is_empty() {
        tracing::warn!("hyperopt template rendered empty; falling back to legacy command");
        return default_command(cfg, shell);
    }
    cmd
}

fn default_command(cfg: &CmdConfig<'_>, shell: Shell) -> String {
    let params = &cfg.params;
    let mut cmd_parts = Vec::new();
    cmd_parts.push(format!("{} {}", cfg.python, cfg.train_script));
    cmd_parts.push("--mode hyperopt".to_string());
    cmd_parts.push(format!("--dataset_type {}", cfg.dataset));
    cmd_parts.push(format!(
        "--use_nn_negatives {}",
        python_bool(params.use_nn_negatives)
    ));
    cmd_parts.push(format!("--max_evals_initial {}", params.max_evals_initial));
    cmd_parts.push(format!("--max_evals_secondary {}", params.max_evals_secondary));
    cmd_parts.push(format!(
        "--total_samples_initial {}",
        params.total_samples_initial
    ));
    cmd_parts.push(format!(
        "--total_samples_secondary {}",
        params.total_samples_secondary
    ));
    cmd_parts.push(format!("--samples_per_epoch {}", params.samples_per_epoch));
    cmd_parts.push(format!("--n_eval {}", params.n_eval));
    cmd_parts.push(format!("--model_name {}", cfg.model.as_str()));
    cmd_parts.push(format!("--models_dir_base {}", cfg.models_dir()));
    cmd_parts.push(format!("--version \"{}\"", cfg.version));
    // Kept even when empty so the output lines up with the default template.
    cmd_parts.push(cfg.extra_args.trim().to_string());
    cmd_parts.push(shell.redirect(&cfg.log_path()));
    cmd_parts.join(" ")
}

// Single pass: substituted values are copied verbatim and never rescanned.
fn render_template(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match replacements.iter().find(|(k, _)| *k == key) {
            Some((_, val)) => out.push_str(val),
            None => out.push_str(&rest[start..start + end + 3]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
