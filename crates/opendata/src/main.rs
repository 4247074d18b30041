mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "opendata")]
#[command(about = "オープンデータのテーブルを公開し、ホスティング記述子を管理する", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 処理済みテーブルを公開用レイアウトに変換
    Publish {
        /// v2 レイアウトで出力（デフォルトは v3）
        #[arg(long)]
        v2: bool,
        /// プログレスバーを表示しない
        #[arg(long)]
        no_progress: bool,
        /// 各ステップの所要時間をログに出力
        #[arg(long)]
        profile: bool,
        /// 処理済みテーブルのディレクトリ
        #[arg(long, env = "OPENDATA_TABLES_FOLDER", default_value = "output/tables")]
        tables_folder: PathBuf,
        /// 公開用ファイルの出力先
        #[arg(long, env = "OPENDATA_OUTPUT_FOLDER", default_value = "output/public")]
        output_folder: PathBuf,
    },
    /// app.yaml を検証
    Validate,
    /// 正規化した app.yaml を表示
    Show {
        /// JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// env_variables をシェルの export 文として出力
    Env,
    /// パブリッシャー用の app.yaml を作成
    Init {
        /// 既存のファイルを上書きする
        #[arg(short, long)]
        force: bool,
        /// app.yaml の代わりにグローバルな publish.yaml を作成
        #[arg(long)]
        settings: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログは stderr に出力（stdout はコマンドの出力に使う）
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if matches!(cli.command, Commands::Publish { profile: true, .. }) {
        // --profile のステップ計測は RUST_LOG に関係なく表示
        filter = filter.add_directive(format!("{}=info", opendata_publish::PROFILE_TARGET).parse()?);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Publish {
            v2,
            no_progress,
            profile,
            tables_folder,
            output_folder,
        } => {
            commands::publish::handle(commands::publish::PublishArgs {
                v2,
                show_progress: !no_progress,
                profile,
                tables_folder,
                output_folder,
            })
            .await?;
        }
        Commands::Validate => {
            commands::validate::handle()?;
        }
        Commands::Show { json } => {
            commands::show::handle(json)?;
        }
        Commands::Env => {
            commands::env::handle()?;
        }
        Commands::Init { force, settings } => {
            if settings {
                commands::init::handle_settings(force)?;
            } else {
                commands::init::handle(force)?;
            }
        }
        Commands::Version => {
            println!("opendata {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
