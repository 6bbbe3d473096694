use assert_cmd::prelude::*; // Add methods on commands
use std::fs::File;
use std::io::Write;
use std::process::{Command, Output}; // Run programs
use tempfile::{Builder, TempDir};

use serde_json::Value;

use crate::{assert_mapped_records, make_mock_mafrepo, memory_catalog_config, SAMPLE_ID};

const TEST_CONFIG_FILE: &str = "mafrepo-test.toml";

fn setup_temp_config(config_str: &str) -> std::io::Result<TempDir> {
    let temp_dir = Builder::new()
        .prefix("mafrepo-test-dir")
        .rand_bytes(5)
        .tempdir()?;

    let mut conf_file = File::create(temp_dir.path().join(TEST_CONFIG_FILE))?;
    conf_file.write_all(config_str.as_bytes())?;

    Ok(temp_dir)
}

// Run the binary off the runtime thread, the mock MAF repository has to keep serving
async fn run_one_off(
    temp_dir: &TempDir,
    sample_id: &str,
    envs: Vec<(&'static str, String)>,
) -> Output {
    let mut command = Command::cargo_bin("mafrepo").expect("mafrepo bin exists");
    command
        .arg("-c")
        .arg(temp_dir.path().join(TEST_CONFIG_FILE))
        .arg("--sample-id")
        .arg(sample_id)
        .env("RUST_LOG", "info")
        .envs(envs);

    tokio::task::spawn_blocking(move || command.output())
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_one_off_request() -> Result<(), Box<dyn std::error::Error>> {
    let mock_server = make_mock_mafrepo().await;
    let temp_dir =
        setup_temp_config(&memory_catalog_config(&format!("{}/api", mock_server.uri())))?;

    let output = run_one_off(&temp_dir, SAMPLE_ID, vec![]).await;
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Logs go to stderr, stdout only has the records
    let records: Value = serde_json::from_slice(&output.stdout)?;
    assert_mapped_records(&records);

    Ok(())
}

#[tokio::test]
async fn test_one_off_url_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let mock_server = make_mock_mafrepo().await;
    let temp_dir = setup_temp_config(&memory_catalog_config("http://unreachable.invalid"))?;

    let output = run_one_off(
        &temp_dir,
        SAMPLE_ID,
        vec![(
            "MAFREPO__GLOBAL_SETTINGS__MAFREPO_URL",
            format!("{}/api", mock_server.uri()),
        )],
    )
    .await;
    assert!(output.status.success());

    let records: Value = serde_json::from_slice(&output.stdout)?;
    assert_mapped_records(&records);

    Ok(())
}

#[tokio::test]
async fn test_one_off_failure() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = setup_temp_config(
        r#"
[catalog]
type = "memory"
"#,
    )?;

    let output = run_one_off(&temp_dir, SAMPLE_ID, vec![]).await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Einstellung 'mafrepo_url' nicht vorhanden"));

    Ok(())
}
