use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const NOTE: &str = r#"{
  "pageWidth": 1404,
  "pageHeight": 1872,
  "pages": [{}, { "text": "hello" }, {}]
}"#;

fn vault_with_note() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Supernote")).unwrap();
    fs::write(dir.path().join("Supernote/20240115-093000.note"), NOTE).unwrap();
    dir
}

fn snexport(vault: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snexport").unwrap();
    cmd.env("NO_COLOR", "1").arg("--vault").arg(vault);
    cmd
}

#[test]
fn test_export_markdown_to_configured_folder() {
    let vault = vault_with_note();

    snexport(vault.path())
        .args(["config", "markdown_path", "notes/out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown_path set to notes/out"));

    snexport(vault.path())
        .args(["export", "Supernote/20240115-093000.note"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Markdown file created at: notes/out/20240115-093000.md",
        ));

    let md = fs::read_to_string(vault.path().join("notes/out/20240115-093000.md")).unwrap();
    assert!(md.starts_with("[[Supernote/20240115-093000.note]]\n"));
    assert!(md.contains("## Page 2\n\nhello\n"));

    // Second export must not overwrite the first
    snexport(vault.path())
        .args(["export", "Supernote/20240115-093000.note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes/out/20240115-093000-1.md"));
}

#[test]
fn test_export_images_and_pdf() {
    let vault = vault_with_note();

    snexport(vault.path())
        .args([
            "export",
            "Supernote/20240115-093000.note",
            "--mode",
            "images",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Image file created at").count(3));

    let images = vault.path().join("_assets/supernote/images");
    for i in 0..3 {
        assert!(images.join(format!("20240115-093000-{}.png", i)).is_file());
    }

    snexport(vault.path())
        .args(["export", "Supernote/20240115-093000.note", "--mode", "pdf"])
        .assert()
        .success();
    let pdf = fs::read(vault.path().join("_assets/supernote/pdf/20240115-093000.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.5"));
}

#[test]
fn test_export_failure_exits_nonzero() {
    let vault = vault_with_note();
    fs::write(vault.path().join("Supernote/broken.note"), b"\x00\x01garbage").unwrap();

    snexport(vault.path())
        .args(["export", "Supernote/broken.note"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Failed to export markdown"));

    snexport(vault.path())
        .args(["export", "Supernote/missing.note"])
        .assert()
        .failure();
}

#[test]
fn test_inspect_and_classify() {
    let vault = vault_with_note();

    snexport(vault.path())
        .args(["inspect", "Supernote/20240115-093000.note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 pages"))
        .stdout(predicate::str::contains("hello"));

    snexport(vault.path())
        .args(["classify", "20240115-093000.note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("daily"));

    snexport(vault.path())
        .args(["classify", "MyIdeas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("concept"));
}

#[test]
fn test_init_and_timestamp() {
    let vault = tempfile::tempdir().unwrap();

    snexport(vault.path()).arg("init").assert().success();
    assert!(vault.path().join(".snexport/config.json").is_file());

    snexport(vault.path())
        .args(["timestamp", "--pattern", "YYYY-MM-DD"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{4}-\d{2}-\d{2}\n$").unwrap());
}
