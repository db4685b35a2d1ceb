//! CLI end-to-end tests that invoke the compiled `pipesync` binary.

use assert_cmd::Command;
use pipesync_test_utils::MINIMAL_DESCRIPTOR;
use pipesync_test_utils::project::TestProject;
use predicates::prelude::*;

fn pipesync(project: &TestProject) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pipesync"));
    cmd.current_dir(project.root())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn content_project() -> TestProject {
    let project = TestProject::new();
    project.write_descriptor(MINIMAL_DESCRIPTOR);
    project.touch("textures/hero.png");
    project
}

#[test]
fn test_help_exits_zero() {
    let project = TestProject::new();
    pipesync(&project)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pipesync"));
}

#[test]
fn test_descriptor_argument_is_required() {
    let project = TestProject::new();
    pipesync(&project).assert().failure();
}

#[test]
fn test_sync_adds_entry() {
    let project = content_project();

    pipesync(&project)
        .arg("Content.mgcb")
        .assert()
        .success()
        .stdout(predicate::str::contains("textures/hero.png"))
        .stdout(predicate::str::contains("1 entries added"));

    project.assert_descriptor_contains(
        "#begin textures/hero.png\n/importer:TextureImporter\n/processor:TextureProcessor\n",
    );
}

#[test]
fn test_second_run_reports_ok() {
    let project = content_project();
    pipesync(&project).arg("Content.mgcb").assert().success();

    pipesync(&project)
        .arg("Content.mgcb")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK 0 entries added"));
}

#[test]
fn test_dry_run_prints_diff_and_writes_nothing() {
    let project = content_project();

    pipesync(&project)
        .args(["Content.mgcb", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+#begin textures/hero.png"))
        .stdout(predicate::str::contains("DRY-RUN"));

    assert_eq!(project.read_descriptor(), MINIMAL_DESCRIPTOR);
}

#[test]
fn test_unresolvable_file_is_only_a_warning() {
    let project = content_project();
    project.touch("docs/notes.xyz");

    pipesync(&project)
        .arg("Content.mgcb")
        .assert()
        .success()
        .stdout(predicate::str::contains("No importer found for file docs/notes.xyz"));
}

#[test]
fn test_missing_descriptor_exits_one() {
    let project = TestProject::new();

    pipesync(&project)
        .arg("Missing.mgcb")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("Unable to find valid content file"));
}

#[test]
fn test_failure_does_not_stop_other_descriptors() {
    let project = content_project();

    pipesync(&project)
        .arg("Missing.mgcb;Content.mgcb")
        .assert()
        .code(1);

    project.assert_descriptor_contains("#begin textures/hero.png");
}

#[test]
fn test_fail_fast_stops_at_first_failure() {
    let project = content_project();

    pipesync(&project)
        .args(["Missing.mgcb;Content.mgcb", "--fail-fast"])
        .assert()
        .code(1);

    assert_eq!(project.read_descriptor(), MINIMAL_DESCRIPTOR);
}

#[test]
fn test_invalid_project_file_exits_one() {
    let project = content_project();

    pipesync(&project)
        .args(["Content.mgcb", "Missing.csproj"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to find valid project file"));

    assert_eq!(project.read_descriptor(), MINIMAL_DESCRIPTOR);
}

#[test]
fn test_references_from_project_file() {
    let project = content_project();
    project.write_config(r#"{"references": ["Foo"], "exclude": ["*.csproj"]}"#);
    project.write_csproj("Game.csproj", &[("Foo", "2.0")]);

    pipesync(&project)
        .args(["Content.mgcb", "Game.csproj"])
        .env("NUGET_PACKAGES", "/packages")
        .assert()
        .success()
        .stdout(predicate::str::contains("reference Foo"));

    project.assert_descriptor_contains("/reference:/packages/foo/2.0/tools/Foo.dll\n");
}

#[test]
fn test_json_report() {
    let project = content_project();

    let output = pipesync(&project)
        .args(["Content.mgcb", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["changed"], true);
    assert_eq!(reports[0]["added"][0]["path"], "textures/hero.png");
    assert_eq!(reports[0]["added"][0]["action"]["importer"], "TextureImporter");
}
