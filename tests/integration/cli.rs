//! The `vend` binary end to end.

use predicates::prelude::*;

use crate::common::CliProject;

fn simple_project() -> CliProject {
    let cli = CliProject::new().unwrap();
    cli.project.write_manifest("[target]\npath = \"example.com/app\"\n").unwrap();
    cli.project.add_source("", &["example.com/lib/net", "fmt"]).unwrap();
    cli.project.add_package("example.com/lib/net", &[]).unwrap();
    cli
}

#[test]
fn test_vendor_command_builds_tree() {
    let cli = simple_project();

    cli.cmd()
        .arg("vendor")
        .assert()
        .success()
        .stdout(predicate::str::contains("linked example.com/lib/net"))
        .stdout(predicate::str::contains("Vendor tree ready"));

    assert!(cli.project.vendored("example.com/lib/net").join("net.go").exists());
    assert!(cli.project.vendored("example.com/app").join("project.go").exists());
}

#[test]
fn test_quiet_vendor_prints_nothing() {
    let cli = simple_project();
    cli.cmd().args(["--quiet", "vendor"]).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_project_flag_selects_directory() {
    let cli = simple_project();
    let project_dir = cli.project.project_dir.clone();

    cli.cmd()
        .current_dir(cli.project.root())
        .args(["--project", "project", "vendor"])
        .assert()
        .success();

    assert!(project_dir.join("vendor").join("src").is_dir());
}

#[test]
fn test_install_repo_flag_overrides_config() {
    let cli = simple_project();
    cli.write_config(&["install_repo = \"/nonexistent/repos\""]).unwrap();

    cli.cmd()
        .args(["vendor", "--install-repo"])
        .arg(&cli.project.install_repo)
        .assert()
        .success();
}

#[test]
fn test_circular_imports_fail_with_chain() {
    let cli = CliProject::new().unwrap();
    cli.project.add_source("", &["example.com/a"]).unwrap();
    cli.project.add_package("example.com/a", &["example.com/b"]).unwrap();
    cli.project.add_package("example.com/b", &["example.com/a"]).unwrap();

    cli.cmd()
        .arg("vendor")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Circular import"))
        .stderr(predicate::str::contains("example.com/a -> example.com/b -> example.com/a"));
}

#[test]
fn test_skip_cycle_policy_from_config() {
    let cli = CliProject::new().unwrap();
    cli.project.add_source("", &["example.com/a"]).unwrap();
    cli.project.add_package("example.com/a", &["example.com/b"]).unwrap();
    cli.project.add_package("example.com/b", &["example.com/a"]).unwrap();
    cli.write_config(&["on_cycle = \"skip\""]).unwrap();

    cli.cmd().arg("vendor").assert().success();
}

#[test]
fn test_missing_sources_report_directory() {
    let cli = CliProject::new().unwrap();

    cli.cmd()
        .arg("vendor")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No source files"));
}

#[test]
fn test_missing_toolchain_is_reported() {
    let cli = simple_project();
    cli.write_config(&["toolchain = \"vend-no-such-toolchain\""]).unwrap();

    cli.cmd()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("vend-no-such-toolchain"));
}

#[cfg(unix)]
#[test]
fn test_build_runs_toolchain_against_vendor_tree() {
    let cli = simple_project();
    cli.fake_toolchain(0).unwrap();

    cli.cmd()
        .args(["build", "--", "-o", "bin/app"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"SEARCH_PATH=\S*project/vendor\n").unwrap())
        .stdout(predicate::str::contains("ARGS=build -o bin/app"))
        .stdout(predicate::str::contains("Build succeeded"));
}

#[cfg(unix)]
#[test]
fn test_failing_toolchain_exits_non_zero() {
    let cli = simple_project();
    cli.fake_toolchain(2).unwrap();

    cli.cmd()
        .arg("build")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed"));
}
