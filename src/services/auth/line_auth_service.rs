//! # LINE Login 인증 서비스
//!
//! LINE Login(OAuth 2.1) 프로토콜을 통한 소셜 로그인 기능을 제공합니다.
//! Google과 달리 SDK 없이 토큰 교환과 프로필 조회를 직접 호출합니다.
//!
//! LINE 프로필 API는 이메일을 제공하지 않으므로, LINE 최초 로그인은
//! 항상 프로바이더-ID 전용 계정(이메일/비밀번호 없음)을 생성합니다.
//! `displayName` 하나만 내려오므로 이름(first_name)으로 매핑합니다.

use std::sync::Arc;
use std::time::Duration;

use crate::config::LineOAuthConfig;
use crate::domain::dto::responses::{AuthResponse, UserResponse};
use crate::domain::models::oauth::{LineProfile, LineTokenResponse};
use crate::errors::{AppError, AppResult};
use crate::repositories::users::user_repo::UserStore;
use crate::services::auth::federation::{
    find_or_link_or_create, ExternalIdentity, IdentityProvider,
};
use crate::services::auth::token_service::TokenService;

const LINE_AUTH_URL: &str = "https://access.line.me/oauth2/v2.1/authorize";
const LINE_TOKEN_URL: &str = "https://api.line.me/oauth2/v2.1/token";
const LINE_PROFILE_URL: &str = "https://api.line.me/v2/profile";

/// LINE Login 인증 서비스
pub struct LineAuthService {
    user_store: Arc<dyn UserStore>,
    token_service: Arc<TokenService>,
    config: LineOAuthConfig,
    http: reqwest::Client,
}

impl LineAuthService {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        token_service: Arc<TokenService>,
        config: LineOAuthConfig,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            user_store,
            token_service,
            config,
            http,
        }
    }

    /// LINE 인증 페이지로 리다이렉트할 Authorization URL 생성
    pub fn login_url(&self, state: &str) -> String {
        let params = [
            ("response_type", "code"),
            ("client_id", self.config.channel_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("state", state),
            ("scope", "profile openid email"),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", LINE_AUTH_URL, query_string)
    }

    /// LINE OAuth 콜백 처리
    ///
    /// # Errors
    ///
    /// * `AppError::AuthFailed` - 토큰 교환 또는 프로필 조회 실패
    pub async fn handle_callback(&self, code: &str) -> AppResult<AuthResponse> {
        let line_token = self.exchange_code(code).await?;
        let profile = self.fetch_profile(&line_token.access_token).await?;

        let identity = ExternalIdentity {
            provider: IdentityProvider::Line,
            provider_user_id: profile.user_id,
            // LINE 프로필 API는 이메일을 내려주지 않습니다
            email: None,
            first_name: profile.display_name,
            last_name: String::new(),
            avatar_url: profile.picture_url,
        };

        let user = find_or_link_or_create(self.user_store.as_ref(), &identity).await?;

        let subject_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let email = user.email.clone().unwrap_or_default();
        let tokens = self.token_service.generate_token_pair(&subject_id, &email)?;

        Ok(AuthResponse::new(
            tokens,
            UserResponse::from_user(&user, user.avatar_url.clone()),
        ))
    }

    /// Authorization Code를 LINE 액세스 토큰으로 교환
    async fn exchange_code(&self, code: &str) -> AppResult<LineTokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
            ("client_id", &self.config.channel_id),
            ("client_secret", &self.config.channel_secret),
        ];

        let response = self
            .http
            .post(LINE_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::AuthFailed(format!("LINE 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::AuthFailed(format!(
                "LINE 토큰 교환 실패: status={} body={}",
                status, error_text
            )));
        }

        response
            .json::<LineTokenResponse>()
            .await
            .map_err(|e| AppError::AuthFailed(format!("LINE 토큰 응답 파싱 실패: {}", e)))
    }

    /// LINE 사용자 프로필 조회
    async fn fetch_profile(&self, access_token: &str) -> AppResult<LineProfile> {
        let response = self
            .http
            .get(LINE_PROFILE_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthFailed(format!("LINE 프로필 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::AuthFailed(format!(
                "LINE 프로필 조회 실패: status={} body={}",
                status, error_text
            )));
        }

        response
            .json::<LineProfile>()
            .await
            .map_err(|e| AppError::AuthFailed(format!("LINE 프로필 파싱 실패: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::repositories::users::memory::InMemoryUserStore;

    fn test_service() -> LineAuthService {
        LineAuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(TokenService::new(&JwtConfig {
                secret: "unit-test-secret".to_string(),
                issuer: "account_service".to_string(),
                access_expiry_minutes: 15,
                refresh_expiry_hours: 168,
            })),
            LineOAuthConfig {
                channel_id: "1234567890".to_string(),
                channel_secret: "channel-secret".to_string(),
                redirect_uri: "http://localhost:8080/api/v1/auth/line/callback".to_string(),
                http_timeout_seconds: 10,
            },
        )
    }

    #[test]
    fn test_login_url_contains_required_params() {
        let service = test_service();
        let url = service.login_url("state-xyz");

        assert!(url.starts_with("https://access.line.me/oauth2/v2.1/authorize?"));
        assert!(url.contains("client_id=1234567890"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=state-xyz"));
        assert!(url.contains("scope=profile%20openid%20email"));
    }
}
