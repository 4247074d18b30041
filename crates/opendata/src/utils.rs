use colored::Colorize;
use opendata_core::{DescriptorError, LoadedDescriptor, Severity, ValidationIssue};

/// app.yaml をロードし、見つからなければ案内を表示して終了
pub fn load_descriptor_or_exit() -> LoadedDescriptor {
    match opendata_core::load_descriptor() {
        Ok(loaded) => loaded,
        Err(DescriptorError::DescriptorNotFound(dir)) => {
            eprintln!("{}", "✗ app.yaml が見つかりません".red().bold());
            eprintln!("  検索開始: {}", dir.display());
            eprintln!();
            eprintln!("app.yaml が存在するディレクトリで実行するか、");
            eprintln!("{} で作成してください", "opendata init".cyan());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

/// 検証結果を重要度ごとに色分けして表示
pub fn print_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        let line = issue.to_string();
        match issue.severity {
            Severity::Error => eprintln!("  {}", line.red()),
            Severity::Warning => eprintln!("  {}", line.yellow()),
        }
    }
}

/// シェル用にエスケープ
pub fn shell_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
