#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::TempDir;

#[allow(deprecated)]
fn run_cli(db_dir: &TempDir, script: &str) -> assert_cmd::assert::Assert {
    let db_path = db_dir.path().join("results.db");
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env(
        "RESULT_DASHBOARD_DATABASE_URL",
        db_path.to_string_lossy().to_string(),
    )
    .env_remove("RESULT_DASHBOARD_CONFIG")
    .env_remove("RESULT_DASHBOARD_TEACHER_USERNAME")
    .env_remove("RESULT_DASHBOARD_TEACHER_PASSWORD")
    .write_stdin(script.to_string())
    .assert()
}

#[test]
fn cli_add_requires_login() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "add 1 80 80 80 80 Rahim\nquit\n")
        .success()
        .stdout(str_contains("Teacher login required."));
}

#[test]
fn cli_rejects_bad_credentials() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "login talha 000000\nquit\n")
        .success()
        .stdout(str_contains("Invalid credentials!"));
}

#[test]
fn cli_add_and_lookup_result() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir,
        "login talha 258090\nadd 7 90 85 80 75 Rahim Uddin\nresult 7\nquit\n",
    )
    .success()
    .stdout(str_contains("Student added successfully!"))
    .stdout(str_contains("Rahim Uddin"))
    .stdout(str_contains("330"))
    .stdout(str_contains("A+"));
}

#[test]
fn cli_reports_validation_errors() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "login talha 258090\nadd 7 90 abc 80 75 Rahim\nquit\n")
        .success()
        .stdout(str_contains("Please enter valid numbers for marks and roll."));
}

#[test]
fn cli_records_persist_between_runs() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "login talha 258090\nadd 3 50 50 50 50 Karim\nquit\n").success();
    run_cli(&dir, "result 3\nresult 4\nquit\n")
        .success()
        .stdout(str_contains("Karim"))
        .stdout(str_contains("Roll number not found."));
}

#[test]
fn cli_delete_missing_roll() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, "login talha 258090\ndelete 99\nquit\n")
        .success()
        .stdout(str_contains("Roll number 99 not found."));
}

#[test]
fn cli_rank_and_export() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("out.csv");
    let script = format!(
        "login talha 258090\nadd 1 90 90 90 90 A\nadd 2 60 60 60 60 B\nrank 2\nexport {}\nquit\n",
        export.display()
    );
    run_cli(&dir, &script)
        .success()
        .stdout(str_contains("Roll 2 is ranked #2."))
        .stdout(str_contains("Exported 2 students"));

    let text = std::fs::read_to_string(&export).unwrap();
    assert!(text.starts_with("Roll No,Name,Bangla,English,Math,Science,Total,Grade\n"));
    assert!(text.contains("2,B,60,60,60,60,240,B"));
}

#[test]
fn cli_timeline_add_and_list() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir,
        "login talha 258090\ntimeline add exam 2025-06-01 Final exam\ntimeline list\nquit\n",
    )
    .success()
    .stdout(str_contains("Added exam on 2025-06-01: Final exam"))
    .stdout(str_contains("2025-06-01  [exam] Final exam"));
}

#[test]
fn cli_export_without_login_leaves_existing_file_untouched() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("keep.csv");
    std::fs::write(&target, "precious data\n").unwrap();

    let script = format!("export {}\nquit\n", target.display());
    run_cli(&dir, &script)
        .success()
        .stdout(str_contains("Teacher login required."));

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "precious data\n");
}
