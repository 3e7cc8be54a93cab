//! # Ticker Core
//!
//! 티커 조회 서비스의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 서비스 전반에서 사용되는 기본 요소를 제공합니다:
//! - 티커 레코드 및 시세 구조체
//! - 설정 관리
//! - 로깅 인프라
//! - 공통 에러 타입

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
