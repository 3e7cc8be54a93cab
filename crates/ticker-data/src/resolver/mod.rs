//! 자유 입력 → 티커 심볼 해석.
//!
//! 1. 심볼/별칭 정확 일치 (대소문자 무시). 일치하면 즉시 반환합니다.
//! 2. 회사명 유사도 매칭. 최고 점수가
//!    - `high` 초과: 자동 채택
//!    - `low` 초과 `high` 이하: 사용자 확인 필요
//!    - 그 외: 찾지 못함
//!
//! 동점이면 테이블 순서상 먼저 나온 레코드가 선택됩니다.

pub mod fuzzy;
pub mod table;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use ticker_core::{clean_user_input, ResolverConfig, TickerRecord};

pub use self::table::{SqliteTickerTable, StaticTickerTable, TickerTable};

/// 해석 임계값 (0~100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverThresholds {
    /// 이 점수를 초과하면 자동 채택
    pub high: u8,
    /// 이 점수를 초과하면 확인 요청
    pub low: u8,
}

impl Default for ResolverThresholds {
    fn default() -> Self {
        Self { high: 80, low: 60 }
    }
}

impl From<&ResolverConfig> for ResolverThresholds {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            high: config.high_threshold,
            low: config.low_threshold,
        }
    }
}

/// 일치 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// 유사도 매칭 후보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub symbol: String,
    pub company_name: String,
    pub score: u8,
}

/// 비대화식 해석 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 심볼 또는 별칭 정확 일치
    Exact { symbol: String },
    /// 유사도 자동 채택
    Matched(Candidate),
    /// 사용자 확인이 필요한 후보
    NeedsConfirmation(Candidate),
    NotFound,
}

impl Resolution {
    /// 확인 없이 채택된 심볼.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Resolution::Exact { symbol } => Some(symbol),
            Resolution::Matched(candidate) => Some(&candidate.symbol),
            Resolution::NeedsConfirmation(_) | Resolution::NotFound => None,
        }
    }

    /// 채택된 결과의 일치 방식.
    pub fn match_kind(&self) -> Option<MatchKind> {
        match self {
            Resolution::Exact { .. } => Some(MatchKind::Exact),
            Resolution::Matched(_) => Some(MatchKind::Fuzzy),
            Resolution::NeedsConfirmation(_) | Resolution::NotFound => None,
        }
    }
}

/// 애매한 후보에 대한 사용자 응답을 받는 인터페이스.
///
/// 터미널처럼 블로킹 입력을 읽는 구현은 런타임 워커를 막지 않도록
/// `tokio::task::spawn_blocking`에서 읽어야 합니다.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// 후보를 제시하고 사용자의 원본 응답을 반환합니다.
    async fn confirm(&self, candidate: &Candidate) -> String;
}

/// 응답이 확인(`y` 또는 `Y`)인지 판단합니다.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

/// 로컬 티커 테이블 기반 해석기.
#[derive(Clone)]
pub struct Resolver {
    table: Arc<dyn TickerTable>,
    thresholds: ResolverThresholds,
}

impl Resolver {
    pub fn new(table: Arc<dyn TickerTable>, thresholds: ResolverThresholds) -> Self {
        Self { table, thresholds }
    }

    pub fn thresholds(&self) -> ResolverThresholds {
        self.thresholds
    }

    /// 티커 테이블 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool> {
        self.table.health_check().await
    }

    /// 확인 절차 없이 입력을 해석합니다.
    ///
    /// 빈 입력은 에러가 아닌 [`Resolution::NotFound`]입니다.
    pub async fn resolve(&self, input: &str) -> Result<Resolution> {
        let cleaned = clean_user_input(input);
        if cleaned.is_empty() {
            return Ok(Resolution::NotFound);
        }

        let records = self.table.load_all().await?;
        let resolution = classify(&records, &cleaned, self.thresholds);
        debug!(input = %cleaned, ?resolution, "Resolved input");
        Ok(resolution)
    }

    /// 확인이 필요하면 `confirmer`에 묻고 최종 심볼을 반환합니다.
    pub async fn resolve_interactive(
        &self,
        input: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<Option<String>> {
        match self.resolve(input).await? {
            Resolution::Exact { symbol } => Ok(Some(symbol)),
            Resolution::Matched(candidate) => Ok(Some(candidate.symbol)),
            Resolution::NeedsConfirmation(candidate) => {
                let answer = confirmer.confirm(&candidate).await;
                if is_confirmation(&answer) {
                    info!(symbol = %candidate.symbol, "Candidate confirmed");
                    Ok(Some(candidate.symbol))
                } else {
                    debug!(symbol = %candidate.symbol, "Candidate rejected");
                    Ok(None)
                }
            }
            Resolution::NotFound => Ok(None),
        }
    }
}

/// 정규화된 입력을 레코드 목록에 대해 분류합니다.
fn classify(records: &[TickerRecord], cleaned: &str, thresholds: ResolverThresholds) -> Resolution {
    if let Some(record) = records.iter().find(|r| r.matches_exactly(cleaned)) {
        return Resolution::Exact {
            symbol: record.symbol.clone(),
        };
    }

    let mut best: Option<Candidate> = None;
    for record in records {
        let score = fuzzy::weighted_ratio(cleaned, &record.company_name);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Candidate {
                symbol: record.symbol.clone(),
                company_name: record.company_name.clone(),
                score,
            });
        }
    }

    match best {
        Some(candidate) if candidate.score > thresholds.high => Resolution::Matched(candidate),
        Some(candidate) if candidate.score > thresholds.low => {
            Resolution::NeedsConfirmation(candidate)
        }
        _ => Resolution::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn sample_table() -> Arc<dyn TickerTable> {
        Arc::new(StaticTickerTable::new(vec![
            TickerRecord::new("AAPL", "Apple Inc.")
                .unwrap()
                .with_nickname("apple"),
            TickerRecord::new("MSFT", "Microsoft Corporation").unwrap(),
            TickerRecord::new("GOOGL", "Alphabet Inc.")
                .unwrap()
                .with_nickname("google"),
            TickerRecord::new("GM", "General Motors").unwrap(),
        ]))
    }

    fn resolver() -> Resolver {
        Resolver::new(sample_table(), ResolverThresholds::default())
    }

    /// 정해진 응답을 돌려주고 호출 횟수를 기록하는 확인기.
    struct ScriptedConfirmer {
        answer: &'static str,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedConfirmer {
        fn new(answer: &'static str) -> Self {
            Self {
                answer,
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Confirmer for ScriptedConfirmer {
        async fn confirm(&self, candidate: &Candidate) -> String {
            self.asked.lock().unwrap().push(candidate.symbol.clone());
            self.answer.to_string()
        }
    }

    #[tokio::test]
    async fn test_exact_symbol_match() {
        let resolution = resolver().resolve("  msft ").await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Exact {
                symbol: "MSFT".to_string()
            }
        );
        assert_eq!(resolution.match_kind(), Some(MatchKind::Exact));
    }

    #[tokio::test]
    async fn test_exact_nickname_short_circuits_fuzzy() {
        // "Google"은 회사명 "Alphabet Inc."와 유사하지 않지만 별칭으로 일치
        let resolution = resolver().resolve("Google").await.unwrap();
        assert_eq!(resolution.symbol(), Some("GOOGL"));
        assert_eq!(resolution.match_kind(), Some(MatchKind::Exact));
    }

    #[tokio::test]
    async fn test_fuzzy_high_score_accepts() {
        let table: Arc<dyn TickerTable> = Arc::new(StaticTickerTable::new(vec![
            TickerRecord::new("AAPL", "Apple Inc.").unwrap(),
        ]));
        let resolver = Resolver::new(table, ResolverThresholds::default());

        match resolver.resolve("Apple").await.unwrap() {
            Resolution::Matched(candidate) => {
                assert_eq!(candidate.symbol, "AAPL");
                assert!(candidate.score > 80);
            }
            other => panic!("expected fuzzy match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fuzzy_word_order() {
        let resolution = resolver().resolve("motors general").await.unwrap();
        assert_eq!(resolution.symbol(), Some("GM"));
        assert_eq!(resolution.match_kind(), Some(MatchKind::Fuzzy));
    }

    #[tokio::test]
    async fn test_middle_band_needs_confirmation() {
        let thresholds = ResolverThresholds { high: 95, low: 60 };
        let resolver = Resolver::new(sample_table(), thresholds);

        // "Apple Computer" vs "Apple Inc." 는 자동 채택 임계값에 못 미침
        match resolver.resolve("Apple Computer").await.unwrap() {
            Resolution::NeedsConfirmation(candidate) => {
                assert_eq!(candidate.symbol, "AAPL");
                assert!(candidate.score > 60 && candidate.score <= 95);
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_low_score_not_found() {
        let resolution = resolver().resolve("zzzzqqq").await.unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_empty_input_not_found() {
        assert_eq!(resolver().resolve("   ").await.unwrap(), Resolution::NotFound);
    }

    #[test]
    fn test_ties_keep_first_record() {
        let records = vec![
            TickerRecord::new("AAA", "Acme Corp").unwrap(),
            TickerRecord::new("BBB", "Acme Corp").unwrap(),
        ];
        match classify(&records, "acme corp", ResolverThresholds::default()) {
            Resolution::Matched(candidate) => assert_eq!(candidate.symbol, "AAA"),
            other => panic!("expected match, got {:?}", other),
        }
    }

    fn apple_only() -> Vec<TickerRecord> {
        vec![TickerRecord::new("AAPL", "Apple Inc.").unwrap()]
    }

    #[test]
    fn test_score_equal_to_high_needs_confirmation() {
        // "apple" vs "Apple Inc." = 90
        let thresholds = ResolverThresholds { high: 90, low: 60 };
        match classify(&apple_only(), "apple", thresholds) {
            Resolution::NeedsConfirmation(candidate) => assert_eq!(candidate.score, 90),
            other => panic!("expected confirmation, got {:?}", other),
        }

        let thresholds = ResolverThresholds { high: 89, low: 60 };
        assert!(matches!(
            classify(&apple_only(), "apple", thresholds),
            Resolution::Matched(_)
        ));
    }

    #[test]
    fn test_score_equal_to_low_not_found() {
        let thresholds = ResolverThresholds { high: 95, low: 90 };
        assert_eq!(
            classify(&apple_only(), "apple", thresholds),
            Resolution::NotFound
        );

        let thresholds = ResolverThresholds { high: 95, low: 89 };
        assert!(matches!(
            classify(&apple_only(), "apple", thresholds),
            Resolution::NeedsConfirmation(_)
        ));
    }

    #[test]
    fn test_long_partial_boundary_matches() {
        // 길이 비 8.0에서도 부분 비율 가중치 0.9 → 90점
        let records = vec![TickerRecord::new("ABC", "Ab Cdefghijklmno").unwrap()];
        match classify(&records, "ab", ResolverThresholds::default()) {
            Resolution::Matched(candidate) => {
                assert_eq!(candidate.symbol, "ABC");
                assert_eq!(candidate.score, 90);
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_health_check_delegates_to_table() {
        assert!(resolver().health_check().await.unwrap());
    }

    #[test]
    fn test_is_confirmation() {
        assert!(is_confirmation("y"));
        assert!(is_confirmation("Y\n"));
        assert!(!is_confirmation("n"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("yes"));
        assert!(!is_confirmation("N"));
    }

    #[tokio::test]
    async fn test_interactive_confirm_and_reject() {
        let thresholds = ResolverThresholds { high: 95, low: 60 };
        let resolver = Resolver::new(sample_table(), thresholds);

        let yes = ScriptedConfirmer::new("Y");
        let symbol = resolver
            .resolve_interactive("Apple Computer", &yes)
            .await
            .unwrap();
        assert_eq!(symbol.as_deref(), Some("AAPL"));
        assert_eq!(yes.asked.lock().unwrap().as_slice(), ["AAPL"]);

        let no = ScriptedConfirmer::new("n");
        let symbol = resolver
            .resolve_interactive("Apple Computer", &no)
            .await
            .unwrap();
        assert!(symbol.is_none());
    }

    #[tokio::test]
    async fn test_interactive_skips_confirmer_for_exact() {
        let confirmer = ScriptedConfirmer::new("n");
        let symbol = resolver()
            .resolve_interactive("AAPL", &confirmer)
            .await
            .unwrap();
        assert_eq!(symbol.as_deref(), Some("AAPL"));
        assert!(confirmer.asked.lock().unwrap().is_empty());
    }
}
