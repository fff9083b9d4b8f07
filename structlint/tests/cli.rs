use std::fs;
use std::path::Path;
use structlint::{exit_code, StructlintCli};
use tempfile::tempdir;

fn run(path: &Path, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["structlint".to_string()];
    argv.extend(args.iter().map(|s| s.to_string()));
    argv.push(path.display().to_string());
    argv.push("--quiet".to_string());
    StructlintCli::new().run(argv)
}

#[test]
fn test_check_empty_project_exits_with_failure() {
    let temp = tempdir().unwrap();

    let err = run(temp.path(), &["check"]).unwrap_err();
    assert_eq!(exit_code(&err), 1);
    assert!(err.to_string().contains("1 error(s), 2 warning(s)"));
}

#[test]
fn test_warnings_only_fail_with_fail_on_warning() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("README.md"), "a".repeat(150)).unwrap();

    run(temp.path(), &["check"]).unwrap();

    let err = run(temp.path(), &["check", "--fail-on", "warning"]).unwrap_err();
    assert_eq!(exit_code(&err), 1);
}

#[test]
fn test_fix_then_check_passes() {
    let temp = tempdir().unwrap();

    run(temp.path(), &["fix", "--all"]).unwrap();
    run(temp.path(), &["check"]).unwrap();

    assert!(fs::metadata(temp.path().join("README.md")).unwrap().len() >= 100);
    assert!(temp.path().join("LICENSE").is_file());
    assert!(temp.path().join(".gitignore").is_file());
}

#[test]
fn test_rules_init_writes_config() {
    let temp = tempdir().unwrap();

    run(temp.path(), &["rules", "init"]).unwrap();

    let written = fs::read_to_string(temp.path().join(".structlint.yaml")).unwrap();
    assert!(written.contains("version: 1"));
    assert!(written.contains("readme"));
}

#[test]
fn test_missing_project_directory_is_an_error() {
    let temp = tempdir().unwrap();

    let err = run(&temp.path().join("nope"), &["check"]).unwrap_err();
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_invalid_config_is_an_error() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(".structlint.yaml"), "version: 7\n").unwrap();

    let err = run(temp.path(), &["check"]).unwrap_err();
    assert_eq!(exit_code(&err), 2);
}
