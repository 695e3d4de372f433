//! 로컬 인증 및 프로필 서비스
//!
//! 이메일/비밀번호 기반의 회원가입, 로그인, 토큰 갱신과
//! 프로필 조회/수정, 아바타 프리사인 URL 발급을 담당합니다.
//!
//! ## 보안 노트
//!
//! 로그인 실패 시 "가입되지 않은 이메일"과 "비밀번호 불일치"를 구분하지
//! 않고 동일한 `InvalidCredentials`로 응답합니다 (계정 열거 방지).
//! 가입 시의 이메일/전화번호 중복 검사는 check-then-act이며, 경쟁 조건은
//! 저장소의 유니크 인덱스가 `Conflict`로 마무리합니다.

use std::sync::Arc;

use crate::domain::dto::requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::domain::dto::responses::{AuthResponse, PresignUploadResponse, UserResponse};
use crate::domain::entities::user::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::user_repo::UserStore;
use crate::services::auth::hash_service::HashService;
use crate::services::auth::token_service::TokenService;
use crate::services::storage::s3_service::StorageService;

/// 허용되는 아바타 콘텐츠 타입과 오브젝트 키 확장자
const AVATAR_CONTENT_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// 로컬 인증/프로필 서비스
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    hash_service: Arc<dyn HashService>,
    token_service: Arc<TokenService>,
    storage_service: Arc<dyn StorageService>,
}

impl AuthService {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        hash_service: Arc<dyn HashService>,
        token_service: Arc<TokenService>,
        storage_service: Arc<dyn StorageService>,
    ) -> Self {
        Self {
            user_store,
            hash_service,
            token_service,
            storage_service,
        }
    }

    /// 회원가입
    ///
    /// 이메일(그리고 입력된 경우 전화번호)의 중복을 확인한 뒤 비밀번호를
    /// 해시하여 사용자를 생성하고 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Conflict` - 이메일 또는 전화번호가 이미 사용 중
    pub async fn register(&self, input: &RegisterRequest) -> AppResult<AuthResponse> {
        if self.user_store.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict);
        }

        if !input.phone_number.is_empty()
            && self
                .user_store
                .find_by_phone_number(&input.phone_number)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict);
        }

        let password_hash = self.hash_service.hash(&input.password)?;

        let phone_number = if input.phone_number.is_empty() {
            None
        } else {
            Some(input.phone_number.clone())
        };

        let user = User::new_local(
            input.email.clone(),
            phone_number,
            password_hash,
            input.first_name.clone(),
            input.last_name.clone(),
        );

        let user = self.user_store.create(user).await?;
        log::info!("새 로컬 사용자 등록: {}", input.email);

        self.auth_output(&user)
    }

    /// 로그인
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidCredentials` - 이메일 미존재 또는 비밀번호 불일치
    ///   (호출자는 둘을 구분할 수 없습니다)
    pub async fn login(&self, input: &LoginRequest) -> AppResult<AuthResponse> {
        let user = self
            .user_store
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // 연합 전용 계정(비밀번호 없음)도 동일하게 실패합니다
        let digest = user.password_hash.as_deref().unwrap_or_default();
        if !self.hash_service.verify(&input.password, digest) {
            return Err(AppError::InvalidCredentials);
        }

        self.auth_output(&user)
    }

    /// 토큰 갱신
    ///
    /// 리프레시 토큰을 검증하고 주체가 여전히 살아 있는지 재확인한 뒤
    /// 새 토큰 쌍을 발급합니다. 기존 리프레시 토큰은 무효화되지 않고
    /// 자연 만료까지 유효합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` - 토큰이 유효하지 않거나 주체가 삭제됨
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self
            .token_service
            .validate(refresh_token)
            .map_err(|_| AppError::Unauthorized)?;

        let user = match self.user_store.find_by_id(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AppError::Unauthorized),
            // 주체 ID는 우리가 서명한 토큰에서 왔으므로 형식 오류도 인증 실패로 취급
            Err(AppError::ValidationError(_)) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };

        self.auth_output(&user)
    }

    /// 프로필 조회
    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserResponse> {
        let user = self
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let avatar_url = self.resolve_avatar_url(&user.avatar_url).await;
        Ok(UserResponse::from_user(&user, avatar_url))
    }

    /// 프로필 수정
    ///
    /// `phone_number`/`avatar_url`의 빈 문자열은 "변경 없음"이며
    /// 기존 값을 지우지 않습니다.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: &UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        let mut user = self
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        user.first_name = input.first_name.clone();
        user.last_name = input.last_name.clone();
        if !input.phone_number.is_empty() {
            user.phone_number = Some(input.phone_number.clone());
        }
        if !input.avatar_url.is_empty() {
            user.avatar_url = input.avatar_url.clone();
        }

        user.touch();
        self.user_store.update(&user).await?;

        let avatar_url = self.resolve_avatar_url(&user.avatar_url).await;
        Ok(UserResponse::from_user(&user, avatar_url))
    }

    /// 아바타 업로드용 프리사인 URL 발급
    ///
    /// 콘텐츠 타입은 허용 목록(jpeg/png/webp/gif)으로 제한되며, 오브젝트
    /// 키는 `avatars/{userID}.{ext}`로 고정됩니다. 실제 업로드 바이트가
    /// 선언된 타입과 일치하는지는 확인하지 않습니다 (호출자 책임).
    pub async fn generate_avatar_upload_url(
        &self,
        user_id: &str,
        content_type: &str,
    ) -> AppResult<PresignUploadResponse> {
        let ext = AVATAR_CONTENT_TYPES
            .iter()
            .find(|(ct, _)| *ct == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "지원하지 않는 콘텐츠 타입입니다: {}",
                    content_type
                ))
            })?;

        let object_key = format!("avatars/{}.{}", user_id, ext);

        let upload_url = self
            .storage_service
            .generate_upload_url(&object_key, content_type)
            .await?;

        Ok(PresignUploadResponse {
            upload_url,
            object_key,
        })
    }

    /// 저장된 아바타 값을 표시용 URL로 해석합니다.
    ///
    /// 빈 값은 그대로, 절대 URL(`http` 접두사)은 원문 그대로 반환하고,
    /// 그 외에는 스토리지 키로 보고 프리사인 GET URL을 요청합니다.
    /// 게이트웨이가 실패하면 요청 전체를 실패시키는 대신 원시 키로
    /// 강등합니다.
    pub async fn resolve_avatar_url(&self, stored: &str) -> String {
        if stored.is_empty() {
            return String::new();
        }

        if stored.starts_with("http") {
            return stored.to_string();
        }

        match self.storage_service.generate_download_url(stored).await {
            Ok(url) => url,
            Err(e) => {
                log::warn!("아바타 프리사인 실패, 원시 키로 강등: {}", e);
                stored.to_string()
            }
        }
    }

    /// 토큰 쌍 + 사용자 응답 조립 (모든 인증 플로우 공통의 마무리)
    fn auth_output(&self, user: &User) -> AppResult<AuthResponse> {
        let subject_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let email = user.email.clone().unwrap_or_default();

        let tokens = self.token_service.generate_token_pair(&subject_id, &email)?;

        Ok(AuthResponse::new(
            tokens,
            UserResponse::from_user(user, user.avatar_url.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::config::JwtConfig;
    use crate::domain::dto::requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};
    use crate::repositories::users::memory::InMemoryUserStore;
    use crate::services::auth::hash_service::BcryptHashService;

    /// 프리사인 URL을 흉내 내는 스토리지 스텁
    struct StubStorage {
        fail: bool,
    }

    #[async_trait]
    impl StorageService for StubStorage {
        async fn generate_upload_url(&self, key: &str, _content_type: &str) -> AppResult<String> {
            if self.fail {
                return Err(AppError::StorageError("stub failure".to_string()));
            }
            Ok(format!("https://bucket.s3.test/{}?presigned=put", key))
        }

        async fn generate_download_url(&self, key: &str) -> AppResult<String> {
            if self.fail {
                return Err(AppError::StorageError("stub failure".to_string()));
            }
            Ok(format!("https://bucket.s3.test/{}?presigned=get", key))
        }
    }

    fn service_with(store: Arc<InMemoryUserStore>, storage_fails: bool) -> AuthService {
        let token_service = Arc::new(TokenService::new(&JwtConfig {
            secret: "unit-test-secret".to_string(),
            issuer: "account_service".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 168,
        }));

        AuthService::new(
            store,
            Arc::new(BcryptHashService::new()),
            token_service,
            Arc::new(StubStorage { fail: storage_fails }),
        )
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw123456".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            phone_number: "+15551234567".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_register_returns_tokens_and_user() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);

        let output = service.register(&register_request()).await.unwrap();

        assert!(!output.access_token.is_empty());
        assert!(!output.refresh_token.is_empty());
        assert_eq!(output.user.first_name, "Jo");
        assert_eq!(output.user.last_name, "Doe");
        assert_eq!(output.user.email.as_deref(), Some("a@x.com"));
    }

    #[actix_web::test]
    async fn test_register_duplicate_email_conflicts() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store.clone(), false);

        service.register(&register_request()).await.unwrap();

        let mut second = register_request();
        second.phone_number = "+15557654321".to_string();
        let result = service.register(&second).await;

        assert!(matches!(result, Err(AppError::Conflict)));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_register_duplicate_phone_conflicts() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);

        service.register(&register_request()).await.unwrap();

        let mut second = register_request();
        second.email = "b@x.com".to_string();
        let result = service.register(&second).await;

        assert!(matches!(result, Err(AppError::Conflict)));
    }

    #[actix_web::test]
    async fn test_register_without_phone_skips_phone_check() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);

        let mut first = register_request();
        first.phone_number = String::new();
        service.register(&first).await.unwrap();

        let mut second = register_request();
        second.email = "b@x.com".to_string();
        second.phone_number = String::new();

        // 전화번호 없는 가입은 여러 명 공존 가능
        service.register(&second).await.unwrap();
    }

    #[actix_web::test]
    async fn test_login_success() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);
        service.register(&register_request()).await.unwrap();

        let output = service
            .login(&LoginRequest {
                email: "a@x.com".to_string(),
                password: "pw123456".to_string(),
            })
            .await
            .unwrap();

        assert!(!output.access_token.is_empty());
    }

    #[actix_web::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);
        service.register(&register_request()).await.unwrap();

        // 올바른 이메일 + 틀린 비밀번호
        let wrong_password = service
            .login(&LoginRequest {
                email: "a@x.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        // 존재하지 않는 이메일
        let unknown_email = service
            .login(&LoginRequest {
                email: "nobody@x.com".to_string(),
                password: "pw123456".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
    }

    #[actix_web::test]
    async fn test_login_federated_only_account_fails_same_way() {
        let store = Arc::new(InMemoryUserStore::new());
        store.seed({
            let mut user = User::new_federated(
                Some("fed@x.com".to_string()),
                "Jo".to_string(),
                "Doe".to_string(),
                String::new(),
            );
            user.google_id = Some("g-1".to_string());
            user
        });
        let service = service_with(store, false);

        let result = service
            .login(&LoginRequest {
                email: "fed@x.com".to_string(),
                password: "anything".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[actix_web::test]
    async fn test_refresh_issues_new_pair() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);
        let registered = service.register(&register_request()).await.unwrap();

        let refreshed = service
            .refresh_token(&registered.refresh_token)
            .await
            .unwrap();

        assert!(!refreshed.access_token.is_empty());
        assert!(!refreshed.refresh_token.is_empty());
        assert_eq!(refreshed.user.id, registered.user.id);
    }

    #[actix_web::test]
    async fn test_refresh_with_garbage_token_is_unauthorized() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);

        let result = service.refresh_token("not-a-token").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[actix_web::test]
    async fn test_refresh_for_deleted_user_is_unauthorized() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store.clone(), false);
        let registered = service.register(&register_request()).await.unwrap();

        store.mark_deleted(&registered.user.id);
        let result = service.refresh_token(&registered.refresh_token).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[actix_web::test]
    async fn test_avatar_upload_url_derives_png_key() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);
        let registered = service.register(&register_request()).await.unwrap();

        let output = service
            .generate_avatar_upload_url(&registered.user.id, "image/png")
            .await
            .unwrap();

        assert_eq!(
            output.object_key,
            format!("avatars/{}.png", registered.user.id)
        );
        assert!(output.upload_url.contains(&output.object_key));
    }

    #[actix_web::test]
    async fn test_avatar_upload_url_rejects_unknown_content_type() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);

        let result = service
            .generate_avatar_upload_url("64f000000000000000000001", "application/pdf")
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_resolve_avatar_url_rules() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);

        assert_eq!(service.resolve_avatar_url("").await, "");
        assert_eq!(
            service.resolve_avatar_url("https://cdn.example.com/a.png").await,
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            service.resolve_avatar_url("avatars/u1.png").await,
            "https://bucket.s3.test/avatars/u1.png?presigned=get"
        );
    }

    #[actix_web::test]
    async fn test_resolve_avatar_url_degrades_on_gateway_failure() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, true);

        // 게이트웨이 실패 시 요청을 실패시키지 않고 원시 키를 반환합니다
        assert_eq!(
            service.resolve_avatar_url("avatars/u1.png").await,
            "avatars/u1.png"
        );
    }

    #[actix_web::test]
    async fn test_update_profile_empty_strings_mean_no_change() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store, false);
        let registered = service.register(&register_request()).await.unwrap();

        let updated = service
            .update_profile(
                &registered.user.id,
                &UpdateProfileRequest {
                    first_name: "Joanna".to_string(),
                    last_name: "Doe".to_string(),
                    phone_number: String::new(),
                    avatar_url: String::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Joanna");
        // 빈 문자열은 기존 전화번호를 지우지 않습니다
        assert_eq!(updated.phone_number, "+15551234567");
    }
}
