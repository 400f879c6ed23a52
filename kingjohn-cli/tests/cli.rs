use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "kingjohn-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).expect("read output")).expect("json")
}

#[test]
fn cli_runs_a_few_days_and_autosaves() {
    let exe = env!("CARGO_BIN_EXE_kingjohn");
    let save_dir = temp_path("days");
    let output_path = temp_path("days-report");
    let status = Command::new(exe)
        .args(["--days", "3", "--report", "json", "--save-dir"])
        .arg(&save_dir)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let report = read_json(&output_path);
    assert_eq!(report["days_simulated"], 3);
    assert_eq!(report["ending"]["kind"], "day_limit");
    assert_eq!(report["end_date"], "Tuesday, January 4, 1205");
    assert!(save_dir.join("autosave.json").exists());
}

#[test]
fn cli_exits_nonzero_on_bankruptcy() {
    let exe = env!("CARGO_BIN_EXE_kingjohn");
    let save_dir = temp_path("bankrupt");
    let schedule = temp_path("bankrupt-schedule");
    std::fs::write(&schedule, r#"{"resources": {"treasury": -9000}}"#).expect("write schedule");
    let output_path = temp_path("bankrupt-report");

    let status = Command::new(exe)
        .args(["--days", "60", "--report", "json", "--no-autosave", "--save-dir"])
        .arg(&save_dir)
        .arg("--consequences")
        .arg(&schedule)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert_eq!(status.code(), Some(1));

    let report = read_json(&output_path);
    assert_eq!(report["ending"]["reason"], "bankruptcy");
    assert_eq!(report["days_simulated"], 31);
    assert!(!save_dir.join("autosave.json").exists());
}

#[test]
fn cli_saves_lists_and_resumes() {
    let exe = env!("CARGO_BIN_EXE_kingjohn");
    let save_dir = temp_path("resume");

    let status = Command::new(exe)
        .args(["--days", "5", "--travel", "york", "--save", "2", "--save-dir"])
        .arg(&save_dir)
        .output()
        .expect("run cli")
        .status;
    assert!(status.success());

    let listing = Command::new(exe)
        .args(["--list-saves", "--save-dir"])
        .arg(&save_dir)
        .output()
        .expect("list saves");
    assert!(listing.status.success());
    let stdout = String::from_utf8_lossy(&listing.stdout);
    assert!(stdout.contains("slot 2"));
    assert!(stdout.contains("York"));

    let output_path = temp_path("resume-report");
    let status = Command::new(exe)
        .args(["--load", "2", "--days", "1", "--report", "json", "--save-dir"])
        .arg(&save_dir)
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("resume");
    assert!(status.success());
    let report = read_json(&output_path);
    assert_eq!(report["days_played"], 6);
    assert_eq!(report["location"], "York");
}

#[test]
fn cli_rejects_missing_save_and_bad_slot() {
    let exe = env!("CARGO_BIN_EXE_kingjohn");
    let save_dir = temp_path("missing");

    let output = Command::new(exe)
        .args(["--load", "3", "--save-dir"])
        .arg(&save_dir)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no saved game"));

    let output = Command::new(exe)
        .args(["--delete", "9", "--save-dir"])
        .arg(&save_dir)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
