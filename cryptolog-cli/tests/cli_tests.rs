use assert_cmd::Command;
use predicates::prelude::*;

fn cryptolog() -> Command {
    let mut cmd = Command::cargo_bin("cryptolog").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn anonymizes_stdin_to_stdout() {
    cryptolog()
        .write_stdin("req from 10.0.0.1 ok\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^req from [A-Za-z0-9+/]{6} ok\n$").unwrap());
}

#[test]
fn passes_through_lines_without_addresses() {
    cryptolog()
        .write_stdin("GET /index.html 200\nno ip here\n")
        .assert()
        .success()
        .stdout("GET /index.html 200\nno ip here\n");
}

#[test]
fn repeated_address_gets_same_pseudonym() {
    let output = cryptolog()
        .write_stdin("a 192.168.0.10\nb 192.168.0.10\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].trim_start_matches("a "), lines[1].trim_start_matches("b "));
}

#[test]
fn first_match_only() {
    cryptolog()
        .args(["--replace-all-matches", "false"])
        .write_stdin("10.0.0.1 and 10.0.0.2\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9+/]{6} and 10\.0\.0\.2\n$").unwrap());
}

#[test]
fn writes_to_outfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");

    cryptolog()
        .args(["--outfile", path.to_str().unwrap()])
        .write_stdin("::1 then 10.0.0.1\n")
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(&path).unwrap();
    let line = written.strip_suffix('\n').expect("newline terminated");
    let (first, second) = line.split_once(" then ").expect("separator kept");
    assert_eq!(first.len(), 6);
    assert_eq!(second.len(), 6);
    assert_ne!(first, second);
}

#[test]
fn unwritable_outfile_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.log");

    cryptolog()
        .args(["--outfile", path.to_str().unwrap()])
        .write_stdin("10.0.0.1\n")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("cannot create output file"));
}

#[test]
fn invalid_salt_lifetime_fails() {
    cryptolog()
        .args(["--salt-lifetime", "soon"])
        .write_stdin("10.0.0.1\n")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn zero_salt_lifetime_fails() {
    cryptolog()
        .args(["--salt-lifetime", "0"])
        .write_stdin("10.0.0.1\n")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Invalid salt lifetime"));
}
