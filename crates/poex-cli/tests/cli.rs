use std::fs;
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const ORDER_A: &str = "\
PURCHASE ORDER 200
07/14/2023
UPS Ground
Destination Net30
017
889900
Pat Lee
ITEM
Unit Cost
Extended Cost
1
Hex bolt
50 EA
08/01/2023
USD
0.40
20.00
TOTAL
";

const ORDER_B: &str = "\
PURCHASE ORDER 100
01/02/2024
Unit Cost
Extended Cost
1
2 PC
USD
5.00
10.00
2
1 BX
USD
3.00
TOTAL
";

const NO_TABLE: &str = "\
Quote 300
Thank you for your business
";

/// Command with its config directory pointed at an empty temp dir.
fn poex(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("poex").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn batch_writes_sorted_csv_from_directory_and_archive() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("a.txt"), ORDER_A).unwrap();
    write_zip(
        &input.path().join("more.zip"),
        &[("inner/b.txt", ORDER_B), ("__MACOSX/inner/._b.txt", "junk")],
    );
    let output = input.path().join("out.csv");

    poex(&home)
        .arg("batch")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 documents"))
        .stdout(predicate::str::contains("Wrote 3 rows"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Document Number,Part/Description,Item Code,"));
    assert!(lines[1].starts_with("PO100,5.00 10.00,1,01/02/2024,"));
    assert!(lines[2].starts_with("PO100,3.00,2,"));
    assert_eq!(
        lines[3],
        "PO200,0.40 20.00,1,07/14/2023,08/01/2023,UPS Ground,Destination,EA,50,0.40,20.00,Net30,017,889900,Pat Lee"
    );
}

#[test]
fn batch_removes_duplicates_unless_disabled() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("a.txt"), ORDER_A).unwrap();
    fs::write(input.path().join("a_copy.txt"), ORDER_A).unwrap();
    let output = input.path().join("out.csv");

    poex(&home)
        .args(["batch", input.path().to_str().unwrap(), "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 duplicates removed"));
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 2);

    poex(&home)
        .args(["batch", input.path().to_str().unwrap(), "--no-dedupe", "-o"])
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 3);
}

#[test]
fn batch_without_rows_writes_nothing() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("quote.txt"), NO_TABLE).unwrap();
    let output = input.path().join("out.csv");
    fs::write(&output, "stale").unwrap();

    poex(&home)
        .args(["batch", input.path().to_str().unwrap(), "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No rows extracted"))
        .stdout(predicate::str::contains("Documents without rows:"));

    assert!(!output.exists());
}

#[test]
fn batch_reports_unreadable_documents_and_continues() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("a.txt"), ORDER_A).unwrap();
    fs::write(input.path().join("broken.pdf"), b"not a pdf").unwrap();
    let output = input.path().join("out.csv");

    poex(&home)
        .args(["batch", input.path().to_str().unwrap(), "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed documents:"))
        .stdout(predicate::str::contains("broken.pdf"))
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("Failed to process"));

    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 2);
}

#[test]
fn batch_json_and_summary() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("b.txt"), ORDER_B).unwrap();
    fs::write(input.path().join("quote.txt"), NO_TABLE).unwrap();
    let output = input.path().join("rows.json");
    let summary = input.path().join("summary.csv");

    poex(&home)
        .args(["batch", input.path().to_str().unwrap(), "-f", "json", "-o"])
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["Document Number"], "PO100");
    assert_eq!(rows[1]["Unit of Measure"], "BX");

    let summary = fs::read_to_string(&summary).unwrap();
    assert!(summary.starts_with("filename,status,document_number,rows,"));
    assert!(summary.contains(",success,PO100,2,"));
    assert!(summary.contains(",empty,PO300,0,"));
}

#[test]
fn batch_fails_when_nothing_matches() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();

    poex(&home)
        .args(["batch", input.path().to_str().unwrap()])
        .current_dir(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No PDF or text documents found"));
}

#[test]
fn process_prints_text_summary() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let path = input.path().join("b.txt");
    fs::write(&path, ORDER_B).unwrap();

    poex(&home)
        .args(["process", "-f", "text"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Purchase Order: PO100"))
        .stdout(predicate::str::contains("Items (2):"))
        .stdout(predicate::str::contains("Total: 13.00"));
}

#[test]
fn process_rejects_unknown_format() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let path = input.path().join("order.docx");
    fs::write(&path, "x").unwrap();

    poex(&home)
        .arg("process")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn lines_prints_indexed_lines() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let path = input.path().join("quote.txt");
    fs::write(&path, "  Quote 300  \n\n\nThanks\n").unwrap();

    poex(&home)
        .arg("lines")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("   0 Quote 300"))
        .stdout(predicate::str::contains("   1 Thanks"));
}

#[test]
fn config_set_then_get_changes_prefix() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let path = input.path().join("b.txt");
    fs::write(&path, ORDER_B).unwrap();

    poex(&home)
        .args(["config", "set", "extraction.document_prefix", "PUR-"])
        .assert()
        .success();

    poex(&home)
        .args(["config", "get", "extraction.document_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"PUR-\""));

    poex(&home)
        .args(["process", "-f", "csv"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("PUR-100,"));

    poex(&home)
        .args(["config", "get", "output.missing"])
        .assert()
        .failure();
}
