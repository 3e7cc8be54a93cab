//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 로컬 티커 테이블 기반 대화식 이름 해석
//! - Provider 체인 심볼 검색, 시세, 일봉 이력 조회
//! - 티커 테이블 관리 (생성, 레코드 추가)

pub mod commands;
