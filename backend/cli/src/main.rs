mod config;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use redpen_core::{FallbackReason, RedpenError};
use redpen_export::export_to_pdf;
use redpen_grader::{DeepSeekProvider, EssayGrader};
use redpen_history::{HistoryStore, JsonFileStore};
use redpen_ocr::TesseractRecognizer;
use redpen_pipeline::GradingPipeline;

use config::Config;

#[derive(Parser)]
#[command(name = "redpen")]
#[command(about = "redpen: AI 作文批改 (handwritten essay grading)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one essay from its page photos
    Grade {
        /// Page images, in reading order
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Inspect or prune past grading results
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Export a grading result as a PDF report
    Export {
        /// History id of the record to export
        id: i64,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List saved results, newest first
    List {
        /// Only results whose essay text contains this query
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one saved result in full
    Show { id: i64 },
    /// Delete one saved result
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    debug!(
        history = %config.history_path.display(),
        model = %config.model,
        offline = config.api_key.is_none(),
        "Configuration loaded"
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Grade { images } => run_grade(&config, images).await?,
        Commands::History { command } => run_history(&config, command)?,
        Commands::Export { id, out } => run_export(&config, id, out)?,
    }

    Ok(())
}

fn open_history(config: &Config) -> HistoryStore {
    HistoryStore::open(Box::new(JsonFileStore::new(&config.history_path)))
}

fn build_grader(config: &Config) -> EssayGrader {
    match &config.api_key {
        Some(key) => {
            let provider = DeepSeekProvider::new(key.clone())
                .with_endpoint(config.api_url.as_str())
                .with_timeout(Duration::from_secs(config.http_timeout_secs));
            EssayGrader::new(Arc::new(provider), config.model.as_str())
        }
        None => EssayGrader::offline(),
    }
}

async fn run_grade(config: &Config, images: Vec<PathBuf>) -> Result<()> {
    let recognizer = Arc::new(TesseractRecognizer::new(config.ocr_language.as_str()));
    let pipeline = GradingPipeline::new(recognizer, build_grader(config));
    let mut history = open_history(config);

    println!("正在處理圖片並批改中，請稍候...");
    let outcome = pipeline.submit(&mut history, &images).await?;

    if outcome.fallback == Some(FallbackReason::QuotaExhausted) {
        println!("DeepSeek API 帳戶餘額不足，目前使用模擬批改數據。請前往 platform.deepseek.com 充值。");
    }

    render::print_record(&outcome.record);
    println!();
    println!("已保存批改結果，編號 {}", outcome.id);
    Ok(())
}

fn run_history(config: &Config, command: HistoryCommands) -> Result<()> {
    let mut history = open_history(config);

    match command {
        HistoryCommands::List { search } => {
            let query = search.unwrap_or_default();
            let mut shown = 0usize;
            for record in history.records() {
                if !query.is_empty() && !record.payload.original_text.contains(&query) {
                    continue;
                }
                println!(
                    "{}  {}  {:>3} 分  {}  {}",
                    record.id,
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.payload.total_score,
                    redpen_core::GradeTier::from_score(record.payload.total_score),
                    render::preview(&record.payload.original_text, 12),
                );
                shown += 1;
            }
            if shown == 0 {
                println!("（沒有符合的批改紀錄）");
            }
        }
        HistoryCommands::Show { id } => match history.get(id) {
            Some(record) => render::print_record(record),
            None => return Err(RedpenError::RecordNotFound(id).into()),
        },
        HistoryCommands::Delete { id } => {
            if history.remove(id)? {
                println!("已刪除紀錄 {id}");
            } else {
                println!("找不到紀錄 {id}");
            }
        }
    }

    Ok(())
}

fn run_export(config: &Config, id: i64, out: PathBuf) -> Result<()> {
    let history = open_history(config);
    let record = history
        .get(id)
        .ok_or(RedpenError::RecordNotFound(id))?;

    let path = export_to_pdf(record, &out)?;
    println!("已匯出 {}", path.display());
    Ok(())
}
