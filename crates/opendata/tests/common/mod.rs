use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_app_yaml(&self, content: &str) {
        fs::write(self.root.path().join("app.yaml"), content).unwrap();
    }

    #[allow(dead_code)]
    pub fn write_table(&self, name: &str, content: &str) {
        let dir = self.tables_folder();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[allow(dead_code)]
    pub fn write_settings(&self, content: &str) {
        fs::write(self.root.path().join("publish.yaml"), content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    #[allow(dead_code)]
    pub fn tables_folder(&self) -> PathBuf {
        self.root.path().join("output").join("tables")
    }

    #[allow(dead_code)]
    pub fn public_folder(&self) -> PathBuf {
        self.root.path().join("output").join("public")
    }

    /// プロジェクト内で実行するコマンド（外部の環境変数の影響を受けない）
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        command_in(self.root.path())
    }
}

#[allow(deprecated)]
pub fn command_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("opendata").unwrap();
    cmd.current_dir(dir)
        .env_remove("OPENDATA_PROJECT_ROOT")
        .env_remove("OPENDATA_TABLES_FOLDER")
        .env_remove("OPENDATA_OUTPUT_FOLDER")
        .env_remove("OPENDATA_SETTINGS_PATH")
        .env_remove("RUST_LOG");
    cmd
}
