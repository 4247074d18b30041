use colored::Colorize;
use opendata_config::PublishSettings;
use opendata_core::AppDescriptor;
use std::path::Path;

const DESCRIPTOR_FILE: &str = "app.yaml";

pub fn handle(force: bool) -> anyhow::Result<()> {
    let path = Path::new(DESCRIPTOR_FILE);
    if path.exists() && !force {
        eprintln!("{}", "✗ app.yaml は既に存在します".red().bold());
        eprintln!("  上書きする場合は {} を指定してください", "--force".cyan());
        std::process::exit(1);
    }

    let content = AppDescriptor::publisher_default().to_yaml()?;
    std::fs::write(path, content)?;

    println!("{}", "✓ app.yaml を作成しました！".green());
    println!();
    println!("{}", "次の手順:".bold());
    println!("  1. env_variables.GCS_SERVICE_ACCOUNT を設定");
    println!("  2. {} で内容を確認", "opendata validate".cyan());
    Ok(())
}

/// デフォルトのパブリッシャー設定をグローバル設定ファイルに書き出す
pub fn handle_settings(force: bool) -> anyhow::Result<()> {
    let path = opendata_config::global_settings_path()?;
    if path.exists() && !force {
        eprintln!("{}", "✗ publish.yaml は既に存在します".red().bold());
        eprintln!("  {}", path.display());
        eprintln!("  上書きする場合は {} を指定してください", "--force".cyan());
        std::process::exit(1);
    }

    std::fs::write(&path, PublishSettings::default().to_yaml()?)?;

    println!("{}", "✓ publish.yaml を作成しました！".green());
    println!("  {}", path.display().to_string().cyan());
    Ok(())
}
