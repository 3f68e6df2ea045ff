//! End-to-end runs of the `svg-data-check` binary
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn check_command(dir: &Path) -> Command {
    let bin_path = std::env::var("CARGO_BIN_EXE_svg-data-check")
        .unwrap_or_else(|_| "target/debug/svg-data-check".to_string());

    // An empty settings file keeps user configuration out of the run
    let settings = dir.join("settings.toml");
    fs::write(&settings, "").expect("write settings");

    let mut command = Command::new(bin_path);
    command.current_dir(dir).arg("--config").arg(&settings);
    command
}

fn run_check(dir: &Path, args: &[&str]) -> Output {
    check_command(dir)
        .args(args)
        .output()
        .expect("Failed to run svg-data-check")
}

#[test]
fn test_clean_file_exits_successfully() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("ok.svg"),
        r#"<svg><rect data-categoryid="c" data-targetviewbox="v" data-zoneid="z"/></svg>"#,
    )
    .expect("write svg");

    let output = run_check(dir.path(), &["ok.svg"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ok.svg: No errors found.\n"
    );
}

#[test]
fn test_findings_exit_with_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.svg"), "<svg>\n<line/>\n</svg>").expect("write svg");

    let output = run_check(dir.path(), &["bad.svg"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bad.svg:2: [line] line missing attribute: data-categoryid"));
    assert!(stdout.contains("3 error(s) found."));
}

#[test]
fn test_json_output_without_line_numbers() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.svg"), "<svg><path/></svg>").expect("write svg");

    let output = run_check(
        dir.path(),
        &["--format", "json", "--no-line-numbers", "bad.svg"],
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");

    assert_eq!(json["clean"], false);
    let findings = json["findings"].as_array().expect("findings");
    assert_eq!(findings.len(), 3);
    assert!(findings.iter().all(|f| f["line"].is_null()));
    assert_eq!(findings[2]["attribute"], "data-zoneid");
}

#[test]
fn test_save_writes_validated_svg_next_to_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let content = "<svg><circle data-zoneid=\" z\"/></svg>";
    fs::write(dir.path().join("in.svg"), content).expect("write svg");

    let output = run_check(dir.path(), &["--save", "in.svg"]);
    assert_eq!(output.status.code(), Some(1));

    let saved = fs::read_to_string(dir.path().join("validated.svg")).expect("saved file");
    assert_eq!(saved, content);
}

#[test]
fn test_save_to_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("in.svg"), "<svg/>").expect("write svg");

    let output = run_check(dir.path(), &["--save=copy.svg", "in.svg"]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("copy.svg")).expect("saved file"),
        "<svg/>"
    );
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_check(dir.path(), &["nope.svg"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read nope.svg"));
}

#[cfg(unix)]
#[test]
fn test_watch_exit_code_follows_last_run() {
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_for_line(rx: &mpsc::Receiver<String>, expected: &str) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(line) if line == expected => return,
                Ok(_) => continue,
                Err(e) => panic!("No {:?} in watch output: {}", expected, e),
            }
        }
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("map.svg");
    fs::write(&path, "<svg><rect/></svg>").expect("write svg");

    let mut child = check_command(dir.path())
        .args(["--watch", "map.svg"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn svg-data-check");

    let stdout = child.stdout.take().expect("child stdout");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    wait_for_line(&rx, "3 error(s) found.");
    thread::sleep(Duration::from_millis(500));

    // Replace by rename so the watcher never reads a half-written file
    let staged = dir.path().join("map.svg.part");
    fs::write(
        &staged,
        r#"<svg><rect data-categoryid="c" data-targetviewbox="v" data-zoneid="z"/></svg>"#,
    )
    .expect("write staged svg");
    fs::rename(&staged, &path).expect("replace svg");
    wait_for_line(&rx, "map.svg: No errors found.");

    let interrupted = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()
        .expect("send SIGINT");
    assert!(interrupted.success());

    let status = child.wait().expect("wait for svg-data-check");
    assert!(status.success(), "exit status: {:?}", status);
}
