use assert_cmd::Command;

fn hyperopt_cmd(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hyperopt_cmd"));
    // Isolate from any config lying around in the developer's checkout.
    cmd.current_dir(dir.path())
        .env_remove("CITEOMATIC_TOOLS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_exits_with_success_on_help() {
    let dir = tempfile::tempdir().expect("tempdir");
    hyperopt_cmd(&dir).arg("--help").assert().success();
}

#[test]
fn test_cli_prints_dblp_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = hyperopt_cmd(&dir).arg("dblp").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(
        stdout,
        "python citeomatic/scripts/train.py --mode hyperopt --dataset_type dblp --use_nn_negatives True --max_evals_initial 75 --max_evals_secondary 10 --total_samples_initial 5000000 --total_samples_secondary 50000000 --samples_per_epoch 1000000 --n_eval 500 --model_name paper_embedder --models_dir_base /net/nfs.corp/s2-research/citeomatic/naacl2017//hyperopts/dblp --version \"3a2ab1173686f91a1a657d4361c1874255ea6baf\"  &> /tmp/dblp.hyperopt.log\n"
    );
}

#[test]
fn test_cli_without_dataset_still_prints() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = hyperopt_cmd(&dir).output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("--dataset_type  --use_nn_negatives"));
}

#[test]
fn test_cli_strict_rejects_empty_dataset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = hyperopt_cmd(&dir).arg("--strict").output().expect("run");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("dataset identifier is empty"), "{stderr}");
}

#[test]
fn test_cli_one_line_per_dataset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = hyperopt_cmd(&dir)
        .args(["dblp", "pubmed", "--shell", "ps"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("*> /tmp/dblp.hyperopt.log"));
    assert!(lines[1].ends_with("*> /tmp/pubmed.hyperopt.log"));
}

#[test]
fn test_cli_reads_config_and_applies_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "log_dir = \"/scratch/logs\"\n[hyperopt]\nn_eval = 42\n")
        .expect("write config");
    let output = hyperopt_cmd(&dir)
        .arg("--config")
        .arg(&path)
        .args(["oc", "--version-id", "cafebabe", "--max-evals-initial", "3"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("--n_eval 42 "));
    assert!(stdout.contains("--max_evals_initial 3 "));
    assert!(stdout.contains("--version \"cafebabe\""));
    assert!(stdout.trim_end().ends_with("&> /scratch/logs/oc.hyperopt.log"));
}

#[test]
fn test_cli_default_config_file_is_picked_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("citeomatic-tools.toml"),
        "python = \"python3\"\n",
    )
    .expect("write config");
    let output = hyperopt_cmd(&dir).arg("dblp").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.starts_with("python3 citeomatic/scripts/train.py "));
}

#[test]
fn test_cli_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    hyperopt_cmd(&dir)
        .args(["dblp", "--config", "does-not-exist.toml"])
        .assert()
        .failure();
}

#[test]
fn test_cli_config_from_env_var() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("from-env.toml");
    std::fs::write(&path, "python = \"python3.11\"\nlog_dir = \"/scratch/env\"\n")
        .expect("write config");
    let output = hyperopt_cmd(&dir)
        .env("CITEOMATIC_TOOLS_CONFIG", &path)
        .arg("dblp")
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.starts_with("python3.11 citeomatic/scripts/train.py "), "{stdout}");
    assert!(stdout.trim_end().ends_with("&> /scratch/env/dblp.hyperopt.log"));
}

#[test]
fn test_cli_broken_default_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("citeomatic-tools.toml"),
        "[hyperopt\nn_eval = 5\n",
    )
    .expect("write config");
    let output = hyperopt_cmd(&dir).arg("dblp").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(
        stdout,
        "python citeomatic/scripts/train.py --mode hyperopt --dataset_type dblp --use_nn_negatives True --max_evals_initial 75 --max_evals_secondary 10 --total_samples_initial 5000000 --total_samples_secondary 50000000 --samples_per_epoch 1000000 --n_eval 500 --model_name paper_embedder --models_dir_base /net/nfs.corp/s2-research/citeomatic/naacl2017//hyperopts/dblp --version \"3a2ab1173686f91a1a657d4361c1874255ea6baf\"  &> /tmp/dblp.hyperopt.log\n"
    );
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("failed to parse config"), "{stderr}");
    assert!(stderr.contains("using defaults"), "{stderr}");
}
