use crate::utils;
use colored::Colorize;

pub fn handle() -> anyhow::Result<()> {
    println!("{}", "app.yaml を検証中...".blue());

    let loaded = utils::load_descriptor_or_exit();
    println!("記述子: {}", loaded.path.display().to_string().cyan());

    if loaded.has_errors() {
        eprintln!();
        eprintln!("{}", "✗ 設定エラー".red().bold());
        utils::print_issues(&loaded.issues);
        std::process::exit(1);
    }

    let descriptor = &loaded.descriptor;
    println!("{}", "✓ 記述子は正常です！".green().bold());
    if !loaded.issues.is_empty() {
        println!();
        println!("{}", "警告:".yellow());
        utils::print_issues(&loaded.issues);
    }

    println!();
    println!("サマリー:");
    println!("  runtime: {}", descriptor.runtime.to_string().cyan());
    println!("  env: {}", descriptor.env.to_string().cyan());
    println!(
        "  entrypoint: {}",
        descriptor.entrypoint.as_deref().unwrap_or("(未設定)")
    );
    match descriptor.instances() {
        Some(instances) => println!("  インスタンス: {}個", instances),
        None => println!("  インスタンス: (自動)"),
    }
    if let Some(resources) = &descriptor.resources {
        let show = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  リソース: cpu {} / memory {}GB / disk {}GB",
            show(resources.cpu),
            show(resources.memory_gb),
            show(resources.disk_size_gb)
        );
    }
    println!("  環境変数: {}個", descriptor.env_variables.len());
    for (name, _) in descriptor.environment_pairs() {
        println!("    - {}", name.cyan());
    }

    match descriptor.service_account() {
        Some(account) if !account.is_empty() => {}
        _ => {
            println!();
            println!(
                "{}",
                "ヒント: GCS_SERVICE_ACCOUNT が空です。デプロイ前に設定してください".yellow()
            );
        }
    }

    Ok(())
}
