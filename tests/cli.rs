use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn contagion() -> Command {
    Command::cargo_bin("contagion").unwrap()
}

#[test]
fn single_person_run() {
    contagion()
        .args(["-n", "1", "-w", "1", "-i", "0"])
        .assert()
        .success()
        .stdout("finished after 0 ticks (terminal): infected=1 healthy=0\n");
}

#[test]
fn single_row_run_with_tick_limit() {
    contagion()
        .args(["-n", "6", "-w", "6", "-s", "1", "-i", "0", "-p", "0s"])
        .args(["--max-ticks", "1"])
        .assert()
        .success()
        .stdout(
            "tick 1: infected=2 healthy=4 new=[1]\n\
             finished after 1 ticks (tick-limit): infected=2 healthy=4\n",
        );
}

#[test]
fn config_file_run() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"population_size": 16, "row_width": 4, "spread_factor": 8,
            "tick_interval": "1ms", "initial_infections": [5]}}"#
    )
    .unwrap();
    let output = contagion()
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("(terminal): infected=16 healthy=0\n"));
}

#[test]
fn interactive_run_reads_stdin() {
    let output = contagion()
        .args(["-n", "4", "-w", "2", "-s", "3", "-p", "1ms", "--interactive"])
        .write_stdin("0\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("(terminal): infected=4 healthy=0\n"));
}

#[test]
fn invalid_configuration_fails() {
    contagion()
        .args(["-w", "0", "-i", "0"])
        .assert()
        .failure()
        .stderr("invalid configuration: row width must be at least 1\n");
}

#[test]
fn log_level_goes_to_stderr() {
    let output = contagion()
        .args(["-n", "1", "-w", "1", "-i", "0", "--log-level", "contagion=info"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("INFO"));
    assert!(stderr.contains("contagion::engine - every member is infected"));
}
