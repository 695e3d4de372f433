//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 계정/인증 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 설계 원칙
//!
//! - 로그인 실패는 "사용자 없음"과 "비밀번호 불일치"를 구분하지 않습니다
//!   (`InvalidCredentials` 하나로 통합 — 계정 열거 공격 방지).
//! - 저장소의 유니크 제약 위반은 `Conflict`로 변환됩니다.
//! - 외부 프로바이더(토큰 교환/프로필 조회) 실패는 `AuthFailed`로 분류되어
//!   콜백 핸들러에서 프론트엔드 에러 페이지로 리다이렉트됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::{AppError, AppResult};
//!
//! async fn login(email: &str, password: &str) -> AppResult<User> {
//!     let user = store.find_by_email(email).await?
//!         .ok_or(AppError::InvalidCredentials)?;
//!     if !hasher.verify(password, user.password_hash.as_deref().unwrap_or("")) {
//!         return Err(AppError::InvalidCredentials);
//!     }
//!     Ok(user)
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 계정/인증 서비스에서 발생할 수 있는 모든 종류의 실패를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 리소스 찾을 수 없음 (404 Not Found)
    #[error("resource not found")]
    NotFound,

    /// 유니크 제약 충돌 — 중복 이메일/전화번호/프로바이더 ID (409 Conflict)
    #[error("conflict with existing resource")]
    Conflict,

    /// 로그인 실패 (401 Unauthorized)
    ///
    /// "사용자 없음"과 "비밀번호 불일치"를 의도적으로 구분하지 않습니다.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// 유효하지 않거나 만료된 인증 상태 (401 Unauthorized)
    #[error("unauthorized")]
    Unauthorized,

    /// JWT 토큰 만료 (401 Unauthorized)
    #[error("token expired")]
    TokenExpired,

    /// JWT 서명/구조/발급자 불일치 (401 Unauthorized)
    #[error("token invalid")]
    TokenInvalid,

    /// 외부 프로바이더 인증 실패 — 토큰 교환 또는 프로필 조회 오류 (401 Unauthorized)
    #[error("provider authentication failed: {0}")]
    AuthFailed(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("database error: {0}")]
    DatabaseError(String),

    /// 오브젝트 스토리지 에러 (500 Internal Server Error)
    #[error("storage error: {0}")]
    StorageError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트에게 전달되는 기계 판독용 에러 코드
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Conflict => "conflict",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Unauthorized => "unauthorized",
            AppError::TokenExpired => "token_expired",
            AppError::TokenInvalid => "token_invalid",
            AppError::AuthFailed(_) => "auth_failed",
            AppError::ValidationError(_) => "validation_error",
            AppError::DatabaseError(_) => "database_error",
            AppError::StorageError(_) => "storage_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl actix_web::ResponseError for AppError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::Unauthorized
            | AppError::TokenExpired
            | AppError::TokenInvalid
            | AppError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.error_code(),
                "message": self.to_string()
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::Conflict;
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound;
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_credential_errors_are_unauthorized() {
        // 로그인 실패 계열은 모두 401로 수렴해야 합니다
        for error in [
            AppError::InvalidCredentials,
            AppError::Unauthorized,
            AppError::TokenExpired,
            AppError::TokenInvalid,
            AppError::AuthFailed("exchange failed".to_string()),
        ] {
            let response = error.error_response();
            assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("email is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("something went wrong".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
