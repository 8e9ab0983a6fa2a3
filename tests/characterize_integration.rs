use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use csv_characterizer_rust::{
    CharacterizeError, OutputFormat, ReportConfig, StatisticsReporter, Target,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(reporter: &StatisticsReporter, target: &Path) -> (String, String, u8) {
    let mut out = Vec::new();
    let mut warnings = Vec::new();
    let outcome = reporter
        .characterize_with_warnings(target, &mut out, &mut warnings)
        .unwrap();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(warnings).unwrap(),
        outcome.exit_code(),
    )
}

fn sample_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "symptoms.csv",
        "disease,symptom,severity\nflu,fever,3\nflu,cough,\ncold,cough,1\n",
    );
    write(dir.path(), "empty.csv", "id,name\n");
    write(dir.path(), "readme.md", "not a table\n");
    dir
}

#[test]
fn test_directory_reports_files_in_name_order() {
    let dir = sample_dir();
    let (out, warnings, code) = run(&StatisticsReporter::default(), dir.path());

    assert_eq!(code, 0);
    assert!(warnings.is_empty());

    let empty_at = out.find("FILE: empty.csv").unwrap();
    let symptoms_at = out.find("FILE: symptoms.csv").unwrap();
    assert!(empty_at < symptoms_at);
    assert!(!out.contains("readme.md"));

    assert!(out.contains("Rows: 3 | Columns: 3"));
    assert!(out.contains("Column names: disease, symptom, severity\n"));
    assert!(out.contains("Missing cells: 1 of 9 (11.11%)\n"));
    assert!(out.contains("  severity: 1 (33.33%)\n"));
    assert!(out.contains("  disease: \"flu\" (2), \"cold\" (1)\n"));
    assert!(out.contains("  symptom: \"cough\" (2), \"fever\" (1)\n"));
}

#[test]
fn test_reference_dataset_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "ref.csv", "a,b\n1,\n1,x\n2,x\n");

    let (out, _, code) = run(&StatisticsReporter::default(), &path);

    assert_eq!(code, 0);
    let sections: Vec<&str> = out
        .lines()
        .filter(|line| !line.starts_with(' ') && !line.is_empty())
        .skip(6)
        .collect();
    assert_eq!(
        sections,
        [
            "Null values",
            "Unique values",
            "Most frequent values",
            "Maximum value length"
        ]
    );
    assert!(out.contains("Null values\n  a: 0 (0.00%)\n  b: 1 (33.33%)\n"));
    assert!(out.contains("Unique values\n  a: 2\n  b: 2\n"));
    assert!(out.contains("  a: \"1\" (2), \"2\" (1)\n  b: \"x\" (2), \"\" (1)\n"));
    assert!(out.contains("Maximum value length\n  a: 1\n  b: 1\n"));
}

#[test]
fn test_valid_and_missing_file_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    let valid = write(dir.path(), "valid.csv", "a\n1\n");
    let missing = dir.path().join("missing.csv");

    let mut out = Vec::new();
    let mut warnings = Vec::new();
    let outcome = StatisticsReporter::default()
        .characterize_files(&[valid.clone(), missing.clone()], &mut out, &mut warnings)
        .unwrap();

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.analyzed, [valid]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].path, missing);
    assert!(matches!(
        outcome.failures[0].error,
        CharacterizeError::FileNotFound { .. }
    ));

    let out = String::from_utf8(out).unwrap();
    let warnings = String::from_utf8(warnings).unwrap();
    assert!(out.contains("FILE: valid.csv"));
    assert!(warnings.starts_with("warning: file not found:"));
    assert!(warnings.contains("missing.csv"));
}

#[cfg(unix)]
#[test]
fn test_dangling_entry_in_directory_is_reported_missing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "valid.csv", "a\n1\n");
    std::os::unix::fs::symlink(
        dir.path().join("gone.csv"),
        dir.path().join("broken.csv"),
    )
    .unwrap();

    let (out, warnings, code) = run(&StatisticsReporter::default(), dir.path());

    assert_eq!(code, 1);
    assert!(out.contains("FILE: valid.csv"));
    assert!(warnings.contains("warning: file not found:"));
    assert!(warnings.contains("broken.csv"));
}

#[test]
fn test_missing_target_path() {
    let dir = tempfile::tempdir().unwrap();
    let (out, warnings, code) = run(
        &StatisticsReporter::default(),
        &dir.path().join("no_such_dir"),
    );

    assert_eq!(code, 1);
    assert!(out.is_empty());
    assert!(warnings.starts_with("warning: file not found:"));
}

#[test]
fn test_runs_are_byte_identical() {
    let dir = sample_dir();
    let reporter = StatisticsReporter::default();

    let first = run(&reporter, dir.path());
    let second = run(&reporter, dir.path());
    assert_eq!(first, second);

    let json = StatisticsReporter::new(ReportConfig::default().with_format(OutputFormat::Json));
    assert_eq!(run(&json, dir.path()), run(&json, dir.path()));
}

#[test]
fn test_json_lines_per_file() {
    let dir = sample_dir();
    let reporter =
        StatisticsReporter::new(ReportConfig::default().with_format(OutputFormat::Json));
    let (out, _, code) = run(&reporter, dir.path());

    assert_eq!(code, 0);
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["file"], "empty.csv");
    assert_eq!(lines[0]["rows"], 0);
    assert_eq!(lines[1]["columns"][2]["nulls"], 1);
    assert_eq!(lines[1]["column_names"][0], "disease");
    assert_eq!(lines[1]["missing_cells"], 1);
    assert_eq!(lines[0]["missing_percentage"], 0.0);
}

#[test]
fn test_pipeline_target_with_missing_clean_data() {
    let source = sample_dir();
    let target = Target::Pipeline {
        source_dir: source.path().to_path_buf(),
        clean_data: source.path().join("clean").join("clean_data.csv"),
    };

    let mut out = Vec::new();
    let mut warnings = Vec::new();
    let outcome = StatisticsReporter::default()
        .characterize_target(&target, &mut out, &mut warnings)
        .unwrap();

    assert_eq!(outcome.analyzed.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(String::from_utf8(warnings).unwrap().contains("clean_data.csv"));
}

#[test]
fn test_semicolon_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "semi.csv", "a;b\nx;1\ny;22\n");

    let reporter = StatisticsReporter::new(ReportConfig::default().with_delimiter(b';'));
    let (out, _, code) = run(&reporter, &path);

    assert_eq!(code, 0);
    assert!(out.contains("Maximum value length\n  a: 1\n  b: 2\n"));
}

fn characterize_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_characterize"));
    for var in [
        "CHARACTERIZE_PATH",
        "CHARACTERIZE_SOURCE_DIR",
        "CHARACTERIZE_CLEAN_DATA",
        "CHARACTERIZE_REPORT_DIR",
        "RUST_LOG",
    ] {
        command.env_remove(var);
    }
    command
}

#[test]
fn test_binary_without_path_is_usage_error() {
    let output = characterize_bin().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing input"));
}

#[test]
fn test_binary_exit_codes() {
    let dir = sample_dir();

    let ok = characterize_bin().arg(dir.path()).output().unwrap();
    assert_eq!(ok.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ok.stdout).contains("FILE: symptoms.csv"));

    write(dir.path(), "zz_bad.csv", "a,b\n1\n");
    let failed = characterize_bin().arg(dir.path()).output().unwrap();
    assert_eq!(failed.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&failed.stdout).contains("FILE: symptoms.csv"));
    assert!(String::from_utf8_lossy(&failed.stderr).contains("warning: cannot parse"));
}

#[test]
fn test_binary_pipeline_with_path_in_environment() {
    let source = sample_dir();
    let clean = tempfile::tempdir().unwrap();
    let clean_data = write(clean.path(), "clean_data.csv", "a\n1\n");
    let elsewhere = tempfile::tempdir().unwrap();

    let output = characterize_bin()
        .env("CHARACTERIZE_PATH", elsewhere.path())
        .arg("--pipeline")
        .arg("--source-dir")
        .arg(source.path())
        .arg("--clean-data")
        .arg(&clean_data)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FILE: symptoms.csv"));
    assert!(stdout.contains("FILE: clean_data.csv"));
}

#[test]
fn test_binary_multiline_cell_cannot_forge_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "notes.csv", "notes\n\"line one\nFILE: fake.csv\"\n");

    let output = characterize_bin().arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let headers: Vec<&str> = stdout.lines().filter(|l| l.starts_with("FILE:")).collect();
    assert_eq!(headers, ["FILE: notes.csv"]);
}

#[test]
fn test_binary_reads_path_from_environment() {
    let dir = sample_dir();
    let output = characterize_bin()
        .env("CHARACTERIZE_PATH", dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}
