//! 티커 조회 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 로컬 티커 테이블로 이름 해석 (애매하면 확인 요청)
//! ticker resolve apple computer
//!
//! # Provider 체인으로 심볼 검색
//! ticker search Tesla
//!
//! # 최신 시세 (정규화 요약 / 원본 JSON)
//! ticker price AAPL
//! ticker price AAPL --json
//!
//! # 최근 5 거래일 일봉
//! ticker history IBM --days 5
//!
//! # 티커 테이블 관리
//! ticker init-db
//! ticker add --symbol AAPL --name "Apple Inc." --nickname apple
//! ```

use clap::{Parser, Subcommand};

use ticker_cli::commands::{lookup, resolve, tickers};
use ticker_core::{init_logging, AppConfig, LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "ticker")]
#[command(about = "Stock ticker lookup CLI - 이름 해석, 시세, 일봉 이력", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: String,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 로컬 티커 테이블로 이름 해석 (입력이 없으면 프롬프트)
    Resolve {
        /// 티커, 별칭 또는 회사명
        input: Vec<String>,

        /// 데이터베이스 URL (기본: 설정의 database.url)
        #[arg(long)]
        db_url: Option<String>,
    },

    /// Provider 체인으로 심볼 검색
    Search {
        /// 회사명 또는 키워드
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// 최신 시세 조회
    Price {
        /// 티커 심볼
        ticker: String,

        /// Provider 응답 원본 JSON 출력
        #[arg(long)]
        json: bool,
    },

    /// 일봉 이력 조회
    History {
        /// 티커 심볼
        ticker: String,

        /// 최근 N 거래일만 출력
        #[arg(short, long)]
        days: Option<usize>,
    },

    /// 티커 테이블 생성
    InitDb {
        /// 데이터베이스 URL (기본: 설정의 database.url)
        #[arg(long)]
        db_url: Option<String>,
    },

    /// 티커 레코드 추가/갱신
    Add {
        /// 티커 심볼 (예: AAPL)
        #[arg(short, long)]
        symbol: String,

        /// 회사명 (예: "Apple Inc.")
        #[arg(short, long)]
        name: String,

        /// 별칭 (예: apple)
        #[arg(long)]
        nickname: Option<String>,

        /// 데이터베이스 URL (기본: 설정의 database.url)
        #[arg(long)]
        db_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    // CLI 출력과 섞이지 않도록 기본은 경고 이상만 출력
    let level = if cli.verbose { "info" } else { "warn" };
    init_logging(
        LogConfig::new(level)
            .with_format(LogFormat::Compact)
            .with_span_events(cli.verbose),
    )
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Resolve { input, db_url } => resolve::run(&config, &input, db_url.as_deref())
            .await
            .map(|_| ()),
        Commands::Search { query } => lookup::search(&config, &query).await,
        Commands::Price { ticker, json } => lookup::price(&config, &ticker, json).await,
        Commands::History { ticker, days } => lookup::history(&config, &ticker, days).await,
        Commands::InitDb { db_url } => tickers::init_db(&config, db_url.as_deref())
            .await
            .map(|_| ()),
        Commands::Add {
            symbol,
            name,
            nickname,
            db_url,
        } => tickers::add(
            &config,
            &symbol,
            &name,
            nickname.as_deref(),
            db_url.as_deref(),
        )
        .await
        .map(|_| ()),
    }
}
