use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use review_intel::{cli, client, config, dashboard, error, predictor, session};
use cli::{Cli, Commands, DashboardArgs};
use client::{AnalysisApi, DatasetFile, HttpAnalysisClient};
use config::Config;
use dashboard::DashboardView;
use predictor::{Predictor, PredictorConfig};
use session::{SessionController, SessionState, SessionStatus, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // RUST_LOG があればそちらを優先
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_api(config: &Config, server: Option<&str>) -> Result<Arc<dyn AnalysisApi>> {
    let base_url = server
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| config.server_url());
    log::info!("analysis server: {}", base_url);
    let client = HttpAnalysisClient::new(base_url, config.request_timeout())?;
    Ok(Arc::new(client))
}

/// 投入を実行し、終わるまでスピナーに進捗を出す
async fn submit_with_progress<F>(session: &SessionController, submit: F) -> Result<SessionState>
where
    F: Future<Output = SubmitOutcome>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut changes = session.subscribe();
    let progress = spinner.clone();
    let watcher = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let message = dashboard::render_session_status(&changes.borrow_and_update());
            progress.set_message(message);
        }
    });

    let outcome = submit.await;
    watcher.abort();
    spinner.finish_and_clear();

    if outcome == SubmitOutcome::Superseded {
        bail!("解析が別の操作に追い越されました");
    }

    let state = session.state().await;
    if let Some(message) = state.error_message() {
        bail!(error::ReviewIntelError::Analysis(message.to_string()));
    }
    println!("✔ {}\n", dashboard::render_session_status(&state));
    Ok(state)
}

async fn analyze_file(session: &SessionController, file: &std::path::Path) -> Result<SessionState> {
    let dataset = DatasetFile::from_path(file)
        .with_context(|| format!("CSVを読み込めません: {}", file.display()))?;
    submit_with_progress(session, session.submit_file(dataset)).await
}

async fn analyze_sample(session: &SessionController, dataset_id: &str) -> Result<SessionState> {
    submit_with_progress(session, session.submit_sample_dataset(dataset_id)).await
}

fn print_dashboard(state: &SessionState, args: &DashboardArgs) {
    let Some(result) = state.result() else {
        return;
    };

    let mut view = DashboardView {
        sort: args.sort.into(),
        expanded: args.expand,
        page: args.page.saturating_sub(1),
        ..Default::default()
    };

    println!("{}\n", dashboard::render_overview(result));
    println!("{}\n", dashboard::render_charts(result));
    for tab in args.tab.tabs() {
        view.select_tab(tab);
        println!("{}\n", view.render_tab(result, None));
    }
}

async fn run_predictor(predictor: &Predictor, request_timeout: Duration) -> Result<()> {
    println!("レビュー本文を1行ずつ入力してください（Ctrl-D で終了）");

    let mut changes = predictor.subscribe();
    let printer = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let view = changes.borrow_and_update().clone();
            println!("{}", dashboard::render_prediction(&view));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("標準入力を読み込めません")?
    {
        predictor.input(&line).await;
    }

    // 最後の入力に対する予測が出るまで待つ
    let settle = async {
        loop {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if predictor.is_settled().await {
                break;
            }
        }
    };
    let waited = tokio::time::timeout(predictor.config().debounce + request_timeout, settle).await;
    if waited.is_err() {
        log::warn!("prediction did not finish in time");
    }

    printer.abort();
    predictor.reset().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Analyze { file, view } => {
            println!("📊 review-intel - レビュー解析\n");
            let session = SessionController::new(build_api(&config, cli.server.as_deref())?);
            let state = analyze_file(&session, &file).await?;
            print_dashboard(&state, &view);
        }

        Commands::Samples { load, view } => {
            let session = SessionController::new(build_api(&config, cli.server.as_deref())?);
            match load {
                Some(id) => {
                    println!("📊 review-intel - サンプル解析\n");
                    let state = analyze_sample(&session, &id).await?;
                    print_dashboard(&state, &view);
                }
                None => {
                    let samples = session.list_sample_datasets().await;
                    if samples.is_empty() {
                        println!("{}", error::ReviewIntelError::NoSampleDatasets);
                    } else {
                        println!("{}", dashboard::render_samples(&samples));
                    }
                }
            }
        }

        Commands::Predict { file, sample } => {
            let api = build_api(&config, cli.server.as_deref())?;
            let session = SessionController::new(api.clone());
            let state = match (file, sample) {
                (Some(file), _) => analyze_file(&session, &file).await?,
                (None, Some(id)) => analyze_sample(&session, &id).await?,
                (None, None) => bail!("--file か --sample で解析対象を指定してください"),
            };
            // 予測は解析結果を表示している間だけ使える
            if state.status() != SessionStatus::Analyzed {
                bail!(error::ReviewIntelError::Analysis(
                    dashboard::render_session_status(&state)
                ));
            }

            let predictor = Predictor::new(api, PredictorConfig::from(&config));
            run_predictor(&predictor, config.request_timeout()).await?;
        }

        Commands::Config { set_server, show } => {
            if let Some(url) = set_server {
                config.set_server_url(url)?;
                config.save()?;
                println!("✔ 解析サーバーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  解析サーバー: {}", config.server_url());
                println!("  タイムアウト: {}秒", config.request_timeout_seconds);
                println!("  予測の最小文字数: {}", config.predict_min_chars);
                println!("  予測の待ち時間: {}ms", config.predict_debounce_ms);
                println!("  テーマ: {}", if config.dark_mode { "ダーク" } else { "ライト" });
            }
        }

        Commands::Theme { toggle } => {
            let dark = if toggle {
                config.toggle_dark_mode(&Config::config_path()?)?
            } else {
                config.dark_mode
            };
            println!("テーマ: {}", if dark { "ダーク" } else { "ライト" });
        }
    }

    Ok(())
}
