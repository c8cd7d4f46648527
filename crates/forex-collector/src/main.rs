//! MAE forex collector CLI.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use forex_collector::{modules, CollectionStats, CollectorConfig};
use forex_core::{init_logging, LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "forex-collector")]
#[command(about = "MAE Forex Batch Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true, default_value = "compact")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// 현재 시세 수집 → public.forex
    Scrape,

    /// 레거시 API 시세 수집 → public.forex_snapshot
    ScrapeLegacy,

    /// 과거 이력 백필 (마지막 저장일 다음 날 ~ 오늘)
    Backfill {
        /// 오늘 날짜 대신 사용할 날짜 (YYYY-MM-DD, 재실행용)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// 로컬 DB의 새 행을 원격 DB로 복사
    Sync {
        /// 복사할 행 수만 보고하고 삽입하지 않음
        #[arg(long)]
        dry_run: bool,
    },

    /// public.forex, public.forex_snapshot 테이블 생성
    InitSchema,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Scrape => "현재 시세 수집",
            Self::ScrapeLegacy => "레거시 시세 수집",
            Self::Backfill { .. } => "과거 이력 백필",
            Self::Sync { .. } => "DB 동기화",
            Self::InitSchema => "스키마 생성",
        }
    }
}

async fn run(command: &Commands, config: &CollectorConfig) -> forex_collector::Result<()> {
    let stats: CollectionStats = match command {
        Commands::Scrape => modules::scrape_forex(config).await?,
        Commands::ScrapeLegacy => modules::scrape_legacy(config).await?,
        Commands::Backfill { today } => modules::backfill_historico(config, *today).await?,
        Commands::Sync { dry_run } => modules::sync_forex(config, *dry_run).await?,
        Commands::InitSchema => {
            modules::create_schema(config).await?;
            return Ok(());
        }
    };

    stats.log_summary(command.name());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(&LogConfig::new(&cli.log_level).with_format(cli.log_format))?;

    let operation = cli.command.name();
    tracing::info!(
        operation = operation,
        started_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=== MAE Forex Collector 시작 ==="
    );

    // 설정 로드
    let result = match CollectorConfig::from_env() {
        Ok(config) => {
            tracing::debug!(
                local_db = ?config.local_db,
                remote_db = ?config.remote_db,
                endpoints = ?config.endpoints,
                "설정 로드 완료"
            );
            run(&cli.command, &config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!(operation = operation, error = %e, "작업 실패");
    }

    tracing::info!(
        operation = operation,
        finished_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=== MAE Forex Collector 종료 ==="
    );

    Ok(result?)
}
