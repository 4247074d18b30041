#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

mod common;

use assert_cmd::Command;
use common::{TestProject, command_in};
use predicates::prelude::*;
use std::fs;

const VALID_APP_YAML: &str = r#"runtime: custom
env: flex
entrypoint: opendata publish --no-progress
manual_scaling:
  instances: 1
resources:
  cpu: 4
  memory_gb: 16
  disk_size_gb: 32
env_variables:
  GCS_SERVICE_ACCOUNT: "publisher@example.iam.gserviceaccount.com"
"#;

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("opendata").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("init"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("opendata").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("opendata"));
}

/// publishコマンドのヘルプにフォルダ指定が含まれることを確認
#[test]
fn test_publish_help() {
    let mut cmd = Command::cargo_bin("opendata").unwrap();
    cmd.arg("publish")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--tables-folder"))
        .stdout(predicate::str::contains("--output-folder"))
        .stdout(predicate::str::contains("--v2"));
}

/// 不正なコマンドでエラーになることを確認
#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("opendata").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

/// app.yaml がない場所での validate はエラーになることを確認
#[test]
fn test_validate_without_project() {
    let dir = tempfile::tempdir().unwrap();
    command_in(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("app.yaml が見つかりません"));
}

#[test]
fn test_validate_valid_descriptor() {
    let project = TestProject::new();
    project.write_app_yaml(VALID_APP_YAML);

    project
        .command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("記述子は正常です"))
        .stdout(predicate::str::contains("GCS_SERVICE_ACCOUNT"));
}

#[test]
fn test_validate_invalid_resources() {
    let project = TestProject::new();
    project.write_app_yaml(&VALID_APP_YAML.replace("cpu: 4", "cpu: 3"));

    project
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("resources.cpu"));
}

/// 未知のキーはパースエラーになることを確認
#[test]
fn test_validate_unknown_key() {
    let project = TestProject::new();
    project.write_app_yaml(&format!("{}handlers: []\n", VALID_APP_YAML));

    project
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("設定エラー"));
}

/// サブディレクトリからでも app.yaml を見つけられることを確認
#[test]
fn test_validate_from_subdirectory() {
    let project = TestProject::new();
    project.write_app_yaml(VALID_APP_YAML);
    let sub = project.path().join("output").join("tables");
    fs::create_dir_all(&sub).unwrap();

    command_in(&sub).arg("validate").assert().success();
}

#[test]
fn test_init_then_validate() {
    let project = TestProject::new();

    project
        .command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("app.yaml を作成しました"));
    assert!(project.path().join("app.yaml").exists());

    // サービスアカウントは空なのでヒントが出る
    project
        .command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("GCS_SERVICE_ACCOUNT が空です"));
}

#[test]
fn test_init_does_not_overwrite() {
    let project = TestProject::new();
    project.write_app_yaml(VALID_APP_YAML);

    project.command().arg("init").assert().failure();
    assert_eq!(
        fs::read_to_string(project.path().join("app.yaml")).unwrap(),
        VALID_APP_YAML
    );

    project.command().args(["init", "--force"]).assert().success();
    let content = fs::read_to_string(project.path().join("app.yaml")).unwrap();
    assert!(content.contains("opendata publish --no-progress"));
}

#[test]
fn test_env_exports_variables() {
    let project = TestProject::new();
    project.write_app_yaml(VALID_APP_YAML);

    project
        .command()
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::eq(
            "export GCS_SERVICE_ACCOUNT='publisher@example.iam.gserviceaccount.com'\n",
        ));
}

#[test]
fn test_show_json() {
    let project = TestProject::new();
    project.write_app_yaml(VALID_APP_YAML);

    let output = project.command().args(["show", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["runtime"], "custom");
    assert_eq!(json["env"], "flex");
    assert_eq!(json["manual_scaling"]["instances"], 1);
    assert_eq!(json["resources"]["memory_gb"], 16);
}

#[test]
fn test_show_normalizes_yaml() {
    let project = TestProject::new();
    project.write_app_yaml("env: flexible\nruntime: custom\nentrypoint: opendata publish\n");

    project
        .command()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("runtime: custom\nenv: flex\n"));
}

#[test]
fn test_publish_missing_tables_folder() {
    let project = TestProject::new();

    project
        .command()
        .args(["publish", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("テーブルのディレクトリが見つかりません"));
}

#[test]
fn test_publish_v3() {
    let project = TestProject::new();
    project.write_settings("start_date: \"2021-01-01\"\nworkers: 2\n");
    project.write_table(
        "index.csv",
        "location_key,country_name\nAD,Andorra\nUS,United States\n",
    );
    project.write_table(
        "epidemiology.csv",
        "date,location_key,new_confirmed\n2021-01-01,AD,1\n2021-01-02,US,2\n",
    );

    project
        .command()
        .args(["publish", "--no-progress", "--profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("公開が完了しました"))
        .stderr(predicate::str::contains("Step finished"))
        .stderr(predicate::str::contains("location aggregates"));

    let v3 = project.public_folder().join("v3");
    assert!(v3.join("index.csv").exists());
    assert!(v3.join("US").join("epidemiology.csv").exists());

    let main = fs::read_to_string(v3.join("AD").join("main.csv")).unwrap();
    assert!(main.starts_with("location_key,date,new_confirmed,country_name\n"));
    assert!(main.contains("AD,2021-01-01,1,Andorra\n"));
}

#[test]
fn test_publish_v2_with_env_folders() {
    let project = TestProject::new();
    project.write_settings("start_date: \"2021-01-01\"\nworkers: 2\n");
    project.write_table("index.csv", "key,country_name\nAD,Andorra\n");
    project.write_table(
        "epidemiology.csv",
        "key,date,new_confirmed\nAD,2021-01-01,1\n",
    );
    let output = project.path().join("site");

    project
        .command()
        .args(["publish", "--v2", "--no-progress"])
        .env("OPENDATA_TABLES_FOLDER", project.tables_folder())
        .env("OPENDATA_OUTPUT_FOLDER", &output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Step finished").not());

    let v2 = output.join("v2");
    assert!(v2.join("main.csv").exists());
    assert!(v2.join("main.json").exists());
    assert!(v2.join("latest").join("epidemiology.csv").exists());
    assert!(v2.join("AD").join("main.json").exists());
}

/// グローバル設定は XDG_CONFIG_HOME 配下に書き出される
#[cfg(target_os = "linux")]
#[test]
fn test_init_settings() {
    let project = TestProject::new();
    let config_home = project.path().join("config");
    fs::create_dir_all(&config_home).unwrap();

    project
        .command()
        .args(["init", "--settings"])
        .env("XDG_CONFIG_HOME", &config_home)
        .assert()
        .success();

    let content =
        fs::read_to_string(config_home.join("opendata").join("publish.yaml")).unwrap();
    assert!(content.contains("2020-01-01"));
    assert!(content.contains("key: location_key"));

    project
        .command()
        .args(["init", "--settings"])
        .env("XDG_CONFIG_HOME", &config_home)
        .assert()
        .failure();
}
