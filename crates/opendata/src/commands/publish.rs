use colored::Colorize;
use opendata_config::PublishSettings;
use opendata_publish::{PublishOptions, publish_v2, publish_v3};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub struct PublishArgs {
    pub v2: bool,
    pub show_progress: bool,
    pub profile: bool,
    pub tables_folder: PathBuf,
    pub output_folder: PathBuf,
}

pub async fn handle(args: PublishArgs) -> anyhow::Result<()> {
    if !args.tables_folder.is_dir() {
        eprintln!("{}", "✗ テーブルのディレクトリが見つかりません".red().bold());
        eprintln!("  {}", args.tables_folder.display());
        eprintln!();
        eprintln!(
            "{} または OPENDATA_TABLES_FOLDER で指定してください",
            "--tables-folder".cyan()
        );
        std::process::exit(1);
    }

    let settings = PublishSettings::load()?;
    let mut options = PublishOptions::new(settings)?;
    options.show_progress = args.show_progress;
    options.profile = args.profile;

    let version = if args.v2 { "v2" } else { "v3" };
    println!(
        "{} {} → {} ({})",
        "公開中:".blue(),
        args.tables_folder.display(),
        args.output_folder.display(),
        version
    );
    info!(
        start = %options.grid.start,
        end = %options.grid.end,
        workers = options.settings.worker_count(),
        "Publishing tables"
    );

    let started = Instant::now();
    let result = if args.v2 {
        publish_v2(&args.output_folder, &args.tables_folder, &options).await
    } else {
        publish_v3(&args.output_folder, &args.tables_folder, &options).await
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 公開に失敗しました".red().bold());
            eprintln!("  {}", e.user_message());
            std::process::exit(1);
        }
    };

    println!("{}", "✓ 公開が完了しました！".green().bold());
    println!();
    println!("サマリー:");
    println!("  出力先: {}", summary.folder.display().to_string().cyan());
    println!("  テーブル: {}個", summary.tables);
    println!("  ロケーション: {}個", summary.locations);
    if summary.json_files > 0 {
        println!("  JSON: {}ファイル", summary.json_files);
    }
    if args.profile {
        println!("  所要時間: {:.1}秒", started.elapsed().as_secs_f64());
    }
    Ok(())
}
