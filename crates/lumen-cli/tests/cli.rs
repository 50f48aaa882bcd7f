use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn lumen() -> Command {
    let mut cmd = Command::cargo_bin("lumen").unwrap();
    cmd.env_remove("LUMEN_LOG")
        .env_remove("LUMEN_CONDITIONALS")
        .env_remove("LUMEN_CALL_FAULTS");
    cmd
}

fn write_script(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("script.lm");
    std::fs::write(&path, contents).unwrap();
    (tmp_dir, path)
}

#[test]
fn eval_prints_float_division() {
    lumen()
        .args(["-e", "8 / 2"])
        .assert()
        .success()
        .stdout("4.0\n");
}

#[test]
fn eval_renders_booleans_and_absent() {
    lumen().args(["-e", "10 > 5"]).assert().success().stdout("True\n");
    lumen()
        .args(["-e", "if (10==20): 8+11"])
        .assert()
        .success()
        .stdout("None\n");
}

#[test]
fn file_lines_share_one_session() {
    let (_dir, path) = write_script("x = 5\n\ny = x + 2\n(33 > 22)?(y):(0)\n");
    lumen()
        .arg(&path)
        .assert()
        .success()
        .stdout("5\n7\n7\n");
}

#[test]
fn file_keeps_going_after_a_bad_line() {
    let (_dir, path) = write_script("1 +\n2 * 3\n");
    lumen()
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("6"))
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn syntax_error_is_nonzero() {
    lumen()
        .args(["-e", "(1 + 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("Expected ')'"));
}

#[test]
fn unknown_function_fails_unless_sentinel() {
    lumen()
        .args(["-e", "nope(1)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown function 'nope'"));
    lumen()
        .args(["--sentinel-errors", "-e", "nope(1)"])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn call_fault_mode_from_environment() {
    lumen()
        .env("LUMEN_CALL_FAULTS", "sentinel")
        .args(["-e", "nope(1)"])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn lazy_flag_skips_untaken_branch() {
    lumen()
        .args(["-e", "if (1==1): 1 else: nope()"])
        .assert()
        .failure();
    lumen()
        .args(["--lazy", "-e", "if (1==1): 1 else: nope()"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn lexical_problems_are_warnings() {
    lumen()
        .args(["-e", "1 + $2"])
        .assert()
        .success()
        .stdout("3\n")
        .stderr(predicate::str::contains("Lex error"));
}

#[test]
fn dump_ast_prints_the_tree() {
    lumen()
        .args(["--dump-ast", "-e", "1 + 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INIT #0"))
        .stdout(predicate::str::ends_with("3\n"));
}

#[test]
fn missing_file_is_reported() {
    lumen()
        .arg("definitely/not/here.lm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn repl_evaluates_and_lists_symbols() {
    assert_cmd::Command::from_std(lumen())
        .write_stdin("width = 640\nwidth / 2\nsymbols\n:reset\nwidth\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("320.0"))
        .stdout(predicate::str::contains("width"))
        .stdout(predicate::str::contains("Goodbye."))
        .stderr(predicate::str::contains("Undefined variable 'width'"));
}

#[test]
fn log_level_flag_is_validated() {
    lumen()
        .args(["--log-level", "debug", "-e", "1 + 1"])
        .assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains("DEBUG"));
    lumen()
        .args(["--log-level", "loud", "-e", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--log-level"));
}
