use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use match_review::client::{list_models_or_empty, EvaluationStore, SimilarityClient};
use match_review::{cli, config, error, render, report, session, upload};
use match_review_common::{top_matches, FetchStatus};
use cli::{Cli, Commands};
use config::Config;
use error::{MatchReviewError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Search { image, limit, exclude_self } => {
            let conn = config.connection()?;
            let thresholds = config.thresholds()?;
            let client = SimilarityClient::new(&conn)?;

            println!("🔍 match-review - 類似画像検索\n");

            let spinner = spinner();
            let mut flow = upload::UploadFlow::new(&client);
            let outcome = flow
                .run(
                    &image,
                    upload::UploadOptions { exclude_self },
                    |status| spinner.set_message(status.to_string()),
                )
                .await;
            spinner.finish_and_clear();
            let outcome = outcome?;

            println!(
                "✔ 画像を最適化: {}x{} ({:.1}KB → {:.1}KB, 圧縮率 {:.2})",
                outcome.image.width,
                outcome.image.height,
                outcome.image.original_size as f64 / 1024.0,
                outcome.image.compressed_size as f64 / 1024.0,
                outcome.image.compression_ratio(),
            );
            if outcome.dropped_self {
                println!("- 自己一致を除外しました");
            }
            println!("✔ {}件の候補\n", outcome.matches.len());

            let limit = limit.unwrap_or(config.result_limit);
            print!(
                "{}",
                render::render_search_results(top_matches(&outcome.matches, limit), Some(&thresholds))
            );
        }

        Commands::Models => {
            let conn = config.connection()?;
            let store = EvaluationStore::new(&conn)?;

            let (models, status) = list_models_or_empty(&store).await;
            if let FetchStatus::Failed { message } = &status {
                println!("⚠ モデル一覧を取得できません: {}", message);
            } else if models.is_empty() {
                println!("評価済みのモデルがありません");
            }
            for model in models {
                println!("{}", model);
            }
        }

        Commands::Evaluate { model, high, low, items, warnings_only, sweep, output } => {
            let conn = config.connection()?;
            let thresholds = config.thresholds_with(high, low)?;
            let store = Arc::new(EvaluationStore::new(&conn)?);

            println!("📊 match-review - モデル評価\n");

            let model = match model {
                Some(model) => model,
                None => select_model_interactive(store.as_ref()).await?,
            };

            let mut session = session::EvaluationSession::new(Arc::clone(&store), thresholds);
            session.select_model(model.clone());

            let spinner = spinner();
            spinner.set_message(format!("{} を読み込み中...", model));
            let status = session.wait_until_loaded().await.clone();
            spinner.finish_and_clear();

            match &status {
                FetchStatus::Failed { message } => {
                    println!("⚠ 評価データを取得できません: {}\n", message);
                }
                FetchStatus::Loaded { items, rejected } => {
                    println!("✔ {}件の評価データ", items);
                    if *rejected > 0 {
                        println!("⚠ {}件の不正な行を除外", rejected);
                    }
                    println!();
                }
                _ => {}
            }

            println!(
                "閾値: high {} / low {}\n",
                thresholds.high(),
                thresholds.low()
            );

            if let Some(reconciliation) = session.reconciliation() {
                print!("{}", render::render_metrics(&reconciliation.metrics));

                if items {
                    println!();
                    for item in &reconciliation.items {
                        if warnings_only && !item.has_warnings() {
                            continue;
                        }
                        println!("{}", render::render_item(item, &thresholds));
                    }
                }

                if sweep {
                    println!();
                    print!(
                        "{}",
                        render::render_sweep(&report::threshold_sweep(session.items(), thresholds.low()))
                    );
                }

                if let Some(path) = output {
                    let report =
                        report::EvaluationReport::new(&model, thresholds, status, reconciliation);
                    report::write_report(&path, &report)?;
                    println!("\n✔ 結果を保存: {}", path.display());
                }
            }

            session.shutdown();
        }

        Commands::Health => {
            let conn = config.connection()?;
            let client = SimilarityClient::new(&conn)?;
            let body = client.health().await?;
            println!("✔ {}: {}", conn.api_url, body.trim());
        }

        Commands::Config { set, show } => {
            let mut config = config;

            if let Some(pair) = set {
                if let [key, value] = pair.as_slice() {
                    config.set(key, value)?;
                    config.save()?;
                    println!("✔ {} を設定しました", key);
                }
            }

            if show {
                let mask = |v: &Option<String>| {
                    v.as_deref()
                        .map(config::mask_secret)
                        .unwrap_or_else(|| "未設定".to_string())
                };
                println!("設定: {}", Config::config_path()?.display());
                println!("  API URL: {}", config.api_url.as_deref().unwrap_or("未設定"));
                println!("  Supabase URL: {}", config.supabase_url.as_deref().unwrap_or("未設定"));
                println!("  Supabase キー: {}", mask(&config.supabase_key));
                println!("  高信頼閾値: {}", config.high_threshold);
                println!("  低閾値: {}", config.low_threshold);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  表示件数: {}", config.result_limit);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "match_review=debug,match_review_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

async fn select_model_interactive(store: &EvaluationStore) -> Result<String> {
    let (models, status) = list_models_or_empty(store).await;
    if let FetchStatus::Failed { message } = status {
        return Err(MatchReviewError::Config(format!(
            "モデル一覧を取得できません: {}",
            message
        )));
    }
    if models.is_empty() {
        return Err(MatchReviewError::NoModelSelected);
    }

    let index = dialoguer::Select::new()
        .with_prompt("モデルを選択")
        .items(&models)
        .default(0)
        .interact()
        .map_err(|e| MatchReviewError::Config(format!("モデル選択に失敗: {}", e)))?;

    Ok(models[index].clone())
}
