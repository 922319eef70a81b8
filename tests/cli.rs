// Command-line behavior that needs no network access

use std::process::{Command, Output};

fn cnpj2parquet(args: &[&str]) -> Output {
    cnpj2parquet_with_env(args, &[])
}

fn cnpj2parquet_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_cnpj2parquet"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("CNPJ2PARQUET_CONFIG")
        .env("CNPJ2PARQUET_LOG_FORMAT", "text")
        .env("NO_COLOR", "1")
        .envs(env.iter().copied())
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let output = cnpj2parquet(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["extract", "export", "links"] {
        assert!(stdout.contains(command), "missing {} in:\n{}", command, stdout);
    }
}

#[test]
fn unknown_datatype_fails() {
    let output = cnpj2parquet(&["extract", "--part", "0", "--datatype", "xyz"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not recognized datatype 'xyz'"));
}

#[test]
fn negative_part_fails() {
    let output = cnpj2parquet(&["extract", "--part", "-1", "--datatype", "est"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Negative values are not allowed"));
}

#[test]
fn zero_batch_size_fails() {
    let output = cnpj2parquet(&[
        "extract",
        "--part",
        "0",
        "--datatype",
        "emp",
        "--batch-size",
        "0",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--batch-size must be greater than 0"));
}

#[test]
fn unknown_projection_is_a_usage_error() {
    let output = cnpj2parquet(&[
        "export",
        "--establishments",
        "est",
        "--companies",
        "emp",
        "--label",
        "1",
        "--projection",
        "everything",
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn export_with_missing_inputs_fails() {
    let output = cnpj2parquet(&[
        "export",
        "--establishments",
        "missing-est.parquet",
        "--companies",
        "missing-emp.parquet",
        "--label",
        "1",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read establishments"));
}

#[test]
fn missing_config_file_fails() {
    let output = cnpj2parquet(&["--config", "/nonexistent/cnpj2parquet.toml", "links"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load configuration"));
}

#[test]
fn large_batch_size_warning_is_logged() {
    let output = cnpj2parquet_with_env(
        &["extract", "--part", "0", "--datatype", "xyz"],
        &[("CNPJ2PARQUET_BATCH_SIZE", "50000000")],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("batch.max_rows = 50000000 is very large"));
}
