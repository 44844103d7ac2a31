use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn tokenize_prints_plain_tokens() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize").arg(fixture_path("openssl.cnf"));

    let output_pred = predicate::str::contains("SectionHeader \"[ ca ]\"")
        .and(predicate::str::contains("KnownPragmaName \"dollarid\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn tokenize_renders_json() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(fixture_path("openssl.cnf"))
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"section-header\""));
}

#[test]
fn tokenize_renders_html() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(fixture_path("openssl.cnf"))
        .arg("-f")
        .arg("html");

    cmd.assert().success().stdout(
        predicate::str::starts_with("<div class=\"highlight\"><pre>")
            .and(predicate::str::contains("<span class=\"k\">[ ca ]</span>")),
    );
}

#[test]
fn tokenize_raw_skips_merging() {
    let file = temp_file(".cnf", "k = ab\n");
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize").arg(file.path()).arg("--raw");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("String \"a\"\nString \"b\"\n"));
}

#[test]
fn tokenize_honours_config_file() {
    let source = temp_file(".cnf", "a = b # c\n");
    let config = temp_file(".toml", "[scanner]\ninline_comments = false\n");
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(source.path())
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Comment").not());
}

#[test]
fn tokenize_uses_explicit_lexer_for_any_file() {
    let file = temp_file(".txt", "a = b\n");
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize").arg(file.path()).arg("--lexer").arg("OpenSSL");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Attribute \"a\""));
}

#[test]
fn tokenize_rejects_unknown_format() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(fixture_path("openssl.cnf"))
        .arg("--format")
        .arg("xml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format 'xml'"));
}

#[test]
fn tokenize_rejects_unknown_lexer() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(fixture_path("openssl.cnf"))
        .arg("--lexer")
        .arg("nope");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no lexer for alias 'nope' found"));
}

#[test]
fn tokenize_raw_rejects_unknown_lexer() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(fixture_path("openssl.cnf"))
        .arg("--raw")
        .arg("--lexer")
        .arg("nope");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no lexer for alias 'nope' found"));
}

#[test]
fn tokenize_raw_with_explicit_lexer() {
    let file = temp_file(".txt", "k = ab\n");
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize")
        .arg(file.path())
        .arg("--raw")
        .arg("--lexer")
        .arg("openssl");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("String \"a\"\nString \"b\"\n"));
}

#[test]
fn tokenize_reports_missing_file() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("tokenize").arg(fixture_path("missing.cnf"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn detect_by_filename_and_content() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("detect").arg(fixture_path("openssl.cnf"));
    cmd.assert().success().stdout("OpenSSL\n");

    let file = temp_file(".txt", "[ req ]\ndefault_bits = 2048\n");
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("detect").arg(file.path());
    cmd.assert().success().stdout("OpenSSL\n");

    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("detect").arg(fixture_path("notes.txt"));
    cmd.assert().success().stdout("unknown\n");
}

#[test]
fn list_lexers_shows_openssl() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.arg("list-lexers");

    cmd.assert().success().stdout(
        predicate::str::contains("OpenSSL")
            .and(predicate::str::contains("aliases: openssl"))
            .and(predicate::str::contains("filenames: *.cnf, *.conf")),
    );
}

#[test]
fn requires_a_subcommand() {
    let mut cmd = cargo_bin_cmd!("cnflex");
    cmd.assert().failure();
}
