use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const FIXTURE: &str = "tests/resources/parcelas.csv";

fn report_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("contract-report"))
}

/// Command pointed at a private (possibly missing) config dir
fn report_cmd_in(temp_dir: &TempDir) -> Command {
    let mut cmd = report_cmd();
    cmd.args(["-C", temp_dir.path().join("config").to_str().unwrap()]);
    cmd
}

fn write_input(dir: &Path, content: &str) -> String {
    let path = dir.join("input.csv");
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_help() {
    report_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("one report row per contract"));
}

#[test]
fn test_version() {
    report_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("contract-report"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config");

    report_cmd_in(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized contract-report config"));

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("[columns]"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();

    report_cmd_in(&temp_dir).arg("init").assert().success();

    report_cmd_in(&temp_dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_columns_lists_default_headers() {
    let temp_dir = TempDir::new().unwrap();

    report_cmd_in(&temp_dir)
        .arg("columns")
        .assert()
        .success()
        .stdout(predicate::str::contains("CódigoContrato"))
        .stdout(predicate::str::contains("Valor Pagamento"))
        .stdout(predicate::str::contains("Data Cancelamento"));
}

#[test]
fn test_process_writes_named_csv_report() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("resultados");

    report_cmd_in(&temp_dir)
        .args([
            "process",
            FIXTURE,
            "--as-of",
            "2024-06-15",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated report 'Jardim das Flores'"))
        .stdout(predicate::str::contains("Contracts: 2"));

    let report = out_dir.join("Jardim das Flores_15-06-2024.csv");
    let content = fs::read_to_string(report).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("CódigoContrato,CódigoCliente,NomeCliente,Valor Total Principal"));
    assert!(lines[1].starts_with("C-100,1,Maria Souza,\"R$ 4,500.00\""));
    assert!(lines[2].contains("01/06/2024"));
}

#[test]
fn test_process_json_format() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");

    report_cmd_in(&temp_dir)
        .args([
            "process",
            FIXTURE,
            "--as-of",
            "15/06/2024",
            "--format",
            "json",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(out_dir.join("Jardim das Flores_15-06-2024.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["title"], "Jardim das Flores");
    assert_eq!(json["contracts"][0]["receivable"], "2000.00");
    assert_eq!(json["contracts"][0]["overdue"], "1000.00");
    assert_eq!(json["contracts"][1]["last_payment_period"], serde_json::Value::Null);
    assert_eq!(json["totals"]["received"], "2010.00");
}

#[test]
fn test_process_xlsx_format() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");

    report_cmd_in(&temp_dir)
        .args([
            "process",
            FIXTURE,
            "--as-of",
            "2024-06-15",
            "--format",
            "xlsx",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jardim das Flores_15-06-2024.xlsx"));

    let bytes = fs::read(out_dir.join("Jardim das Flores_15-06-2024.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_process_unknown_format_fails() {
    let temp_dir = TempDir::new().unwrap();

    report_cmd_in(&temp_dir)
        .args(["process", FIXTURE, "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid report format 'pdf'"));
}

#[test]
fn test_process_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");

    report_cmd_in(&temp_dir)
        .args([
            "process",
            FIXTURE,
            "--as-of",
            "2024-06-15",
            "--dry-run",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL"))
        .stdout(predicate::str::contains("C-200"))
        .stdout(predicate::str::contains("not written"));

    assert!(!out_dir.exists());
}

#[test]
fn test_process_missing_column_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let input = write_input(
        temp_dir.path(),
        "CódigoContrato,CódigoCliente,NomeCliente,NomeLoteamento,Valor Total,DataVencimento,MesAnoRef\n\
         A,1,Maria,Lote,100,2024-01-10,01/2024\n",
    );

    report_cmd_in(&temp_dir)
        .args(["process", &input, "-o", out_dir.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing required column(s): Valor Pagamento",
        ));

    assert!(!out_dir.exists());
}

#[test]
fn test_process_empty_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        temp_dir.path(),
        "CódigoContrato,CódigoCliente,NomeCliente,NomeLoteamento,Valor Total,Valor Pagamento,DataVencimento,MesAnoRef\n",
    );

    report_cmd_in(&temp_dir)
        .args(["process", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no rows"));
}

#[test]
fn test_process_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();

    report_cmd_in(&temp_dir)
        .args(["process", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_invalid_as_of() {
    let temp_dir = TempDir::new().unwrap();

    report_cmd_in(&temp_dir)
        .args(["process", FIXTURE, "--as-of", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --as-of value 'yesterday'"));
}

#[test]
fn test_process_reports_coercion_warnings() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let input = write_input(
        temp_dir.path(),
        "CódigoContrato,CódigoCliente,NomeCliente,NomeLoteamento,Valor Total,Valor Pagamento,DataVencimento,MesAnoRef\n\
         A,1,Maria,Lote,100,abc,2024-01-10,01/2024\n",
    );

    report_cmd_in(&temp_dir)
        .args([
            "process",
            &input,
            "--as-of",
            "2024-06-15",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:  1"))
        .stderr(predicate::str::contains("'abc' in column 'Valor Pagamento'"));

    assert!(out_dir.join("Lote_15-06-2024.csv").exists());
}

#[test]
fn test_config_overrides_delimiter_and_currency() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config");
    let out_dir = temp_dir.path().join("out");

    fs::create_dir_all(&config_path).unwrap();
    fs::write(
        config_path.join("config.toml"),
        "[input]\ndelimiter = \";\"\n\n[report]\ncurrency_symbol = \"$\"\n",
    )
    .unwrap();

    report_cmd_in(&temp_dir)
        .args([
            "process",
            "tests/resources/parcelas_ponto_e_virgula.csv",
            "--as-of",
            "2024-06-15",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(out_dir.join("Vila Nova_15-06-2024.csv")).unwrap();
    assert!(content.contains("\"$ 3,300.00\""));
    assert!(content.contains("$ 76.50"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config");

    fs::create_dir_all(&config_path).unwrap();
    fs::write(config_path.join("config.toml"), "[report\n").unwrap();

    report_cmd_in(&temp_dir)
        .arg("columns")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
