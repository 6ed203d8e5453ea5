//! End-to-end tests of the `sample-sheet` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn cmd() -> Command {
    Command::cargo_bin("sample-sheet").unwrap()
}

#[test]
fn test_validate_text() {
    cmd()
        .arg("validate")
        .arg(fixture("paired-end-single-index.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Samples: 5"))
        .stdout(predicate::str::contains("paired-end"))
        .stdout(predicate::str::contains("Index design: single"));
}

#[test]
fn test_validate_json() {
    let output = cmd()
        .args(["--format", "json", "validate"])
        .arg(fixture("dual-index-manifests.csv"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["samples"], 3);
    assert_eq!(value["read_structure"], "151T8B8B151T");
    assert_eq!(value["index_design"], "dual");
    assert_eq!(value["custom_sections"], serde_json::json!(["Manifests"]));
}

#[test]
fn test_validate_reports_line_of_bad_index() {
    cmd()
        .arg("validate")
        .arg(fixture("invalid-index.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 8"))
        .stderr(predicate::str::contains("ACUGTN"));
}

#[test]
fn test_validate_from_stdin() {
    cmd()
        .args(["validate", "-"])
        .write_stdin("[Reads]\n151\n[Data]\nSample_ID,index\n1,ACGT\n2,TTTT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("single-end"));
}

#[test]
fn test_duplicates_fail_unless_lenient() {
    let text = "[Data]\nSample_ID,Library_ID\n49,234T\n49,234T\n";

    cmd()
        .args(["validate", "-"])
        .write_stdin(text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Two equivalent samples"));

    cmd()
        .args(["--lenient", "validate", "-"])
        .write_stdin(text)
        .assert()
        .success()
        .stderr(predicate::str::contains("Two equivalent samples"));
}

#[test]
fn test_kit_names_require_flag() {
    let text = "[Data]\nSample_ID,index\n1,SI-GA-H1\n";

    cmd().args(["validate", "-"]).write_stdin(text).assert().failure();
    cmd()
        .args(["--allow-kit-names", "validate", "-"])
        .write_stdin(text)
        .assert()
        .success();
}

#[test]
fn test_json_compact() {
    cmd()
        .args(["json", "--compact", "-"])
        .write_stdin("[Header]\nDate,2018\n[Data]\nSample_ID\n49\n")
        .assert()
        .success()
        .stdout(
            r#"{"Header":{"Date":"2018"},"Reads":[],"Settings":{},"Data":[{"Sample_ID":"49"}]}
"#,
        );
}

#[test]
fn test_write_canonical_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("canonical.csv");

    cmd()
        .arg("write")
        .arg(fixture("dual-index-manifests.csv"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("[Header],,,,,,,\nIEMFileVersion,5,,,,,,\n"));
    assert!(text.contains("[Manifests],,,,,,,\n"));
    assert!(text.contains("\"Tumor, pre-treatment\""));

    cmd().arg("validate").arg(&output).assert().success();
}

#[test]
fn test_write_rejects_zero_blank_lines() {
    cmd()
        .arg("write")
        .arg(fixture("paired-end-single-index.csv"))
        .args(["--blank-lines", "0"])
        .assert()
        .failure();
}

#[test]
fn test_design_formats() {
    cmd()
        .arg("design")
        .arg(fixture("paired-end-single-index.csv"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "| Sample_ID | Sample_Name  | Library_ID | Description    |\n",
        ));

    cmd()
        .args(["--format", "tsv", "design"])
        .arg(fixture("paired-end-single-index.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1823A\t1823A-tissue\t2017-01-20\t0.5x treatment\n",
        ));
}

#[test]
fn test_design_without_samples_fails() {
    cmd()
        .args(["design", "-"])
        .write_stdin("[Header]\nDate,2018\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No samples"));
}

#[test]
fn test_picard_params() {
    let dir = TempDir::new().unwrap();
    let params = dir.path().join("params");

    cmd()
        .arg("picard")
        .arg(fixture("paired-end-single-index.csv"))
        .arg("--directory")
        .arg(&params)
        .args(["--bam-prefix", "/bams", "--lane", "1", "--lane", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("library_params.2.txt"));

    let library = fs::read_to_string(params.join("library_params.1.txt")).unwrap();
    assert!(library.starts_with("BARCODE_1\tOUTPUT\tSAMPLE_ALIAS\tLIBRARY_NAME\tDS\n"));
    assert!(library.contains("/bams/1823A-tissue.2017-01-20/1823A-tissue.GAATCTGA.1.bam"));
    assert!(library.ends_with("N\t/bams/unmatched.1.bam\tunmatched\tunmatchedunmatched\t\n"));
    assert!(params.join("barcode_params.2.txt").exists());
}
