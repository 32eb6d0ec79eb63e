use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.path().join(name);
    fs::write(&path, content)?;
    Ok(path)
}

fn xmlenum() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("xmlenum")?)
}

#[test]
fn test_catalog_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let file = write_file(
        &dir,
        "catalog.xml",
        "<catalog><item><name>A</name></item><item><price>9</price></item></catalog>",
    )?;

    xmlenum()?
        .arg("catalog")
        .arg(&file)
        .assert()
        .success()
        .stdout("item\n    name\n    price\n");
    Ok(())
}

#[test]
fn test_merges_multiple_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let first = write_file(&dir, "a.xml", "<root><a><x/></a></root>")?;
    let second = write_file(&dir, "b.xml", "<root><a><y/></a><b/></root>")?;

    xmlenum()?
        .arg("root")
        .arg(&first)
        .arg(&second)
        .assert()
        .success()
        .stdout("b\na\n    x\n    y\n");
    Ok(())
}

#[test]
fn test_indent_option() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let file = write_file(&dir, "a.xml", "<root><a><x/></a></root>")?;

    xmlenum()?
        .args(["--indent", "2", "root"])
        .arg(&file)
        .assert()
        .success()
        .stdout("a\n  x\n");
    Ok(())
}

#[test]
fn test_root_not_found_prints_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let file = write_file(&dir, "a.xml", "<other><x/></other>")?;

    xmlenum()?
        .arg("root")
        .arg(&file)
        .assert()
        .success()
        .stdout("");
    Ok(())
}

#[test]
fn test_missing_arguments_is_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    xmlenum()?
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    xmlenum()?
        .arg("root")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn test_missing_file_names_the_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let good = write_file(&dir, "good.xml", "<root><a/></root>")?;
    let missing = dir.path().join("missing.xml");

    xmlenum()?
        .arg("root")
        .arg(&good)
        .arg(&missing)
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("couldn't open"))
        .stderr(predicate::str::contains("missing.xml"));
    Ok(())
}

#[test]
fn test_parse_error_names_file_and_position() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let good = write_file(&dir, "good.xml", "<root><a/></root>")?;
    let bad = write_file(&dir, "bad.xml", "<root>\n<a></b>\n</root>")?;

    xmlenum()?
        .arg("root")
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("couldn't parse"))
        .stderr(predicate::str::contains("bad.xml"))
        .stderr(predicate::str::contains("error at 2:4"));
    Ok(())
}

#[test]
fn test_max_size_option() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let file = write_file(&dir, "a.xml", "<root><a/></root>")?;

    xmlenum()?
        .args(["--max-size", "8", "root"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max size exceeded"));
    Ok(())
}
