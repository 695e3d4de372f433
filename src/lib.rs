//! 계정/인증 서비스 백엔드
//!
//! Rust 기반의 사용자 계정 및 인증 서비스입니다.
//! 로컬 자격 증명과 두 외부 프로바이더(Google, LINE)의 OAuth 2.0 연합 로그인,
//! JWT 발급/검증, 프리사인 URL 기반 아바타 관리를 제공합니다.
//!
//! # Features
//!
//! - **로컬 인증**: 이메일/비밀번호 가입, 로그인, 토큰 갱신
//! - **연합 인증**: Google/LINE OAuth 2.0 — 공유 find-or-link-or-create 정합
//! - **JWT 인증**: 액세스/리프레시 토큰 기반 상태 없는 인증
//! - **프로필 관리**: 조회/수정, S3 프리사인 아바타 업로드/다운로드 URL
//! - **MongoDB**: 사용자 데이터 영구 저장 (sparse unique 인덱스, 소프트 삭제)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 인증 플로우 / 토큰 / 해시 / 스토리지
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← Identity Store (UserStore trait)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! 모든 컴포넌트는 생성자 주입으로 조립됩니다 — 전역 싱글톤이나
//! 암묵적 컨텍스트 조회는 사용하지 않습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use account_service_backend::config::AppConfig;
//! use account_service_backend::services::auth::{AuthService, TokenService};
//!
//! let config = AppConfig::from_env();
//! let token_service = Arc::new(TokenService::new(&config.jwt));
//!
//! // 사용자 가입 및 토큰 발급
//! let output = auth_service.register(&request).await?;
//! println!("access token: {}", output.access_token);
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
