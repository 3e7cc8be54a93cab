//! 티커 레코드 타입.
//!
//! 로컬 조회 테이블의 한 행(심볼, 회사명, 별칭)을 나타냅니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TickerError, TickerResult};

/// 티커 레코드.
///
/// `symbol`은 테이블 내에서 유일합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// 거래소 심볼 (예: AAPL)
    pub symbol: String,
    /// 회사명 (예: Apple Inc.)
    pub company_name: String,
    /// 별칭 (예: apple)
    pub nickname: Option<String>,
}

impl TickerRecord {
    /// 새 티커 레코드를 생성합니다.
    ///
    /// 심볼은 앞뒤 공백을 제거하고 대문자로 저장합니다.
    pub fn new(symbol: impl Into<String>, company_name: impl Into<String>) -> TickerResult<Self> {
        let symbol = symbol.into().trim().to_uppercase();
        let company_name = company_name.into().trim().to_string();

        if symbol.is_empty() {
            return Err(TickerError::InvalidInput("symbol is empty".to_string()));
        }
        if company_name.is_empty() {
            return Err(TickerError::InvalidInput(format!(
                "company name is empty for {}",
                symbol
            )));
        }

        Ok(Self {
            symbol,
            company_name,
            nickname: None,
        })
    }

    /// 별칭을 설정합니다. 빈 문자열은 별칭 없음으로 취급합니다.
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        let nickname = nickname.into().trim().to_string();
        self.nickname = (!nickname.is_empty()).then_some(nickname);
        self
    }

    /// 정규화된 입력이 심볼 또는 별칭과 정확히 일치하는지 확인합니다.
    ///
    /// 대소문자는 구분하지 않습니다.
    pub fn matches_exactly(&self, cleaned_input: &str) -> bool {
        self.symbol.to_lowercase() == cleaned_input
            || self
                .nickname
                .as_deref()
                .is_some_and(|n| n.trim().to_lowercase() == cleaned_input)
    }
}

impl fmt::Display for TickerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.company_name, self.symbol)
    }
}

/// 사용자 입력을 정규화합니다 (앞뒤 공백 제거, 소문자 변환).
pub fn clean_user_input(input: &str) -> String {
    input.trim().to_lowercase()
}

/// 티커 심볼을 정규화합니다 (앞뒤 공백 제거, 대문자 변환).
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_symbol() {
        let record = TickerRecord::new(" aapl ", "Apple Inc.").unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.company_name, "Apple Inc.");
        assert!(record.nickname.is_none());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(TickerRecord::new("  ", "Apple Inc.").is_err());
        assert!(TickerRecord::new("AAPL", "").is_err());
    }

    #[test]
    fn test_matches_exactly() {
        let record = TickerRecord::new("GOOGL", "Alphabet Inc.")
            .unwrap()
            .with_nickname("Google");

        assert!(record.matches_exactly("googl"));
        assert!(record.matches_exactly("google"));
        assert!(!record.matches_exactly("alphabet"));
    }

    #[test]
    fn test_empty_nickname_is_none() {
        let record = TickerRecord::new("MSFT", "Microsoft Corporation")
            .unwrap()
            .with_nickname("   ");
        assert!(record.nickname.is_none());
        assert!(!record.matches_exactly(""));
    }

    #[test]
    fn test_clean_user_input() {
        assert_eq!(clean_user_input("  Apple Inc  "), "apple inc");
        assert_eq!(normalize_ticker(" msft"), "MSFT");
    }
}
