//! 인증 핸들러
//!
//! 로컬 인증(JSON API)과 연합 인증(브라우저 리다이렉트)의 HTTP 진입점입니다.
//!
//! 연합 콜백은 브라우저 내비게이션이므로 실패 시 JSON 에러 대신
//! 프론트엔드 에러 페이지로 리다이렉트합니다.

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::config::AppConfig;
use crate::domain::{
    AuthResponse, LoginRequest, OAuthCallbackQuery, RefreshTokenRequest, RegisterRequest,
};
use crate::errors::AppError;
use crate::services::auth::{AuthService, GoogleAuthService, LineAuthService};

fn redirect_to(location: String) -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", location))
        .finish()
}

/// 콜백 성공/실패를 프론트엔드 리다이렉트로 변환합니다.
fn finish_oauth_callback(
    provider: &str,
    frontend_url: &str,
    query: &OAuthCallbackQuery,
    result: Option<Result<AuthResponse, AppError>>,
) -> HttpResponse {
    if let Some(error) = &query.error {
        log::warn!("{} OAuth 에러: {}", provider, error);
        return redirect_to(format!("{}/signin?error=auth_failed", frontend_url));
    }

    match result {
        None => redirect_to(format!("{}/signin?error=no_code", frontend_url)),
        Some(Err(e)) => {
            log::error!("{} 콜백 처리 실패: {}", provider, e);
            redirect_to(format!("{}/signin?error=auth_failed", frontend_url))
        }
        Some(Ok(output)) => redirect_to(format!(
            "{}/auth/callback?token={}&refresh_token={}",
            frontend_url, output.access_token, output.refresh_token
        )),
    }
}

#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let output = auth_service.register(&payload).await?;

    Ok(HttpResponse::Created().json(output))
}

#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let output = auth_service.login(&payload).await?;

    Ok(HttpResponse::Ok().json(output))
}

#[post("/refresh")]
pub async fn refresh_token(
    payload: web::Json<RefreshTokenRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let output = auth_service.refresh_token(&payload.refresh_token).await?;

    Ok(HttpResponse::Ok().json(output))
}

#[get("/google/login")]
pub async fn google_login(google_service: web::Data<GoogleAuthService>) -> HttpResponse {
    let state = uuid::Uuid::new_v4().to_string();
    redirect_to(google_service.login_url(&state))
}

#[get("/google/callback")]
pub async fn google_callback(
    query: web::Query<OAuthCallbackQuery>,
    google_service: web::Data<GoogleAuthService>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let result = match query.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => Some(google_service.handle_callback(code).await),
        None => None,
    };

    finish_oauth_callback("Google", &config.server.frontend_url, &query, result)
}

#[get("/line/login")]
pub async fn line_login(line_service: web::Data<LineAuthService>) -> HttpResponse {
    let state = uuid::Uuid::new_v4().to_string();
    redirect_to(line_service.login_url(&state))
}

#[get("/line/callback")]
pub async fn line_callback(
    query: web::Query<OAuthCallbackQuery>,
    line_service: web::Data<LineAuthService>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let result = match query.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => Some(line_service.handle_callback(code).await),
        None => None,
    };

    finish_oauth_callback("LINE", &config.server.frontend_url, &query, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> OAuthCallbackQuery {
        OAuthCallbackQuery {
            code: None,
            state: None,
            error: None,
            error_description: None,
        }
    }

    fn location_of(response: &HttpResponse) -> &str {
        response
            .headers()
            .get("Location")
            .and_then(|h| h.to_str().ok())
            .unwrap()
    }

    #[test]
    fn test_callback_without_code_redirects_with_no_code_error() {
        let response =
            finish_oauth_callback("Google", "http://localhost:3000", &empty_query(), None);

        assert_eq!(response.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(
            location_of(&response),
            "http://localhost:3000/signin?error=no_code"
        );
    }

    #[test]
    fn test_callback_failure_redirects_with_auth_failed() {
        let response = finish_oauth_callback(
            "LINE",
            "http://localhost:3000",
            &empty_query(),
            Some(Err(AppError::AuthFailed("exchange failed".to_string()))),
        );

        assert_eq!(
            location_of(&response),
            "http://localhost:3000/signin?error=auth_failed"
        );
    }

    #[test]
    fn test_provider_error_redirects_even_with_code() {
        let mut query = empty_query();
        query.code = Some("some-code".to_string());
        query.error = Some("access_denied".to_string());

        // 프로바이더 에러가 있으면 코드 처리 결과와 무관하게 실패 리다이렉트
        let response = finish_oauth_callback("Google", "http://localhost:3000", &query, None);

        assert_eq!(
            location_of(&response),
            "http://localhost:3000/signin?error=auth_failed"
        );
    }
}
