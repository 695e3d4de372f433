//! # Google OAuth 2.0 인증 서비스
//!
//! Google OAuth 2.0 프로토콜을 통한 소셜 로그인 기능을 제공합니다.
//! RFC 6749 OAuth 2.0 표준과 Google의 OAuth 2.0 구현을 준수합니다.
//!
//! ## OAuth 2.0 Authorization Code Flow
//!
//! ```text
//! ┌─────────────┐                 ┌─────────────────┐                ┌─────────────────┐
//! │   클라이언트   │                 │   우리 서버      │                │  Google OAuth   │
//! └─────────────┘                 └─────────────────┘                └─────────────────┘
//!        │ 1. GET /auth/google/login         │                               │
//!        ├──────────────────────────────────►│                               │
//!        │ 2. 302 Redirect to Google         │                               │
//!        │◄──────────────────────────────────┤                               │
//!        │ 3. User authenticates             │                               │
//!        ├───────────────────────────────────────────────────────────────────►│
//!        │ 4. Redirect with auth code        │                               │
//!        │◄───────────────────────────────────────────────────────────────────┤
//!        │ 5. GET /auth/google/callback?code │                               │
//!        ├──────────────────────────────────►│ 6. Exchange code for token    │
//!        │                                   ├──────────────────────────────►│
//!        │                                   │ 7. Fetch userinfo             │
//!        │                                   ├──────────────────────────────►│
//!        │                                   │ 8. find-or-link-or-create     │
//!        │ 9. Redirect with JWT tokens       │                               │
//!        │◄──────────────────────────────────┤                               │
//! ```
//!
//! ## 사용하는 Google API 엔드포인트
//!
//! | 용도 | 엔드포인트 | 메서드 |
//! |------|------------|--------|
//! | **Authorization** | `https://accounts.google.com/o/oauth2/auth` | GET |
//! | **Token Exchange** | `https://oauth2.googleapis.com/token` | POST |
//! | **User Info** | `https://www.googleapis.com/oauth2/v2/userinfo` | GET |

use std::sync::Arc;
use std::time::Duration;

use crate::config::GoogleOAuthConfig;
use crate::domain::dto::responses::{AuthResponse, UserResponse};
use crate::domain::models::oauth::{GoogleTokenResponse, GoogleUserInfo};
use crate::errors::{AppError, AppResult};
use crate::repositories::users::user_repo::UserStore;
use crate::services::auth::federation::{
    find_or_link_or_create, ExternalIdentity, IdentityProvider,
};
use crate::services::auth::token_service::TokenService;

/// Google OAuth 2.0 인증 서비스
///
/// Authorization Code를 프로바이더 액세스 토큰으로 교환하고, 프로필을
/// 조회한 뒤 공유 정합 알고리즘으로 로컬 사용자에 연결합니다.
pub struct GoogleAuthService {
    user_store: Arc<dyn UserStore>,
    token_service: Arc<TokenService>,
    config: GoogleOAuthConfig,
    http: reqwest::Client,
}

impl GoogleAuthService {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        token_service: Arc<TokenService>,
        config: GoogleOAuthConfig,
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

    /// Google 인증 페이지로 리다이렉트할 Authorization URL 생성
    pub fn login_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("response_type", "code"),
            ("state", state),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.auth_uri, query_string)
    }

    /// Google OAuth 콜백 처리
    ///
    /// 코드 교환 → 프로필 조회 → 계정 정합 → 토큰 쌍 발급.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthFailed` - 토큰 교환 또는 프로필 조회 실패
    ///   (핸들러가 프론트엔드 에러 페이지로 리다이렉트)
    pub async fn handle_callback(&self, code: &str) -> AppResult<AuthResponse> {
        let token_response = self.exchange_code(code).await?;
        let user_info = self.fetch_user_info(&token_response.access_token).await?;

        let identity = ExternalIdentity {
            provider: IdentityProvider::Google,
            provider_user_id: user_info.id,
            email: user_info.email,
            first_name: user_info.given_name,
            last_name: user_info.family_name,
            avatar_url: user_info.picture,
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

    /// Authorization Code를 액세스 토큰으로 교환
    async fn exchange_code(&self, code: &str) -> AppResult<GoogleTokenResponse> {
        let params = [
            ("code", code),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("redirect_uri", &self.config.redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.config.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::AuthFailed(format!("Google 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::AuthFailed(format!(
                "Google 토큰 교환 실패: status={} body={}",
                status, error_text
            )));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| AppError::AuthFailed(format!("Google 토큰 응답 파싱 실패: {}", e)))
    }

    /// 프로바이더 액세스 토큰으로 사용자 프로필 조회
    async fn fetch_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self
            .http
            .get(&self.config.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthFailed(format!("Google 사용자 정보 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::AuthFailed(format!(
                "Google 사용자 정보 조회 실패: status={} body={}",
                status, error_text
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::AuthFailed(format!("Google 사용자 정보 파싱 실패: {}", e)))
    }
}
