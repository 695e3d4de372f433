//! 연합 계정 정합(reconciliation)
//!
//! 두 프로바이더(Google, LINE)는 와이어 세부사항만 다르고 계정 정합은
//! 하나의 find-or-link-or-create 알고리즘을 공유합니다.
//!
//! ## 정합 순서
//!
//! ```text
//! 프로바이더 ID로 조회
//!        │
//!        ├─ 있음 ──► 빈 이름 backfill / 아바타 변경 반영 ──► 사용 (4)
//!        │
//!        └─ 없음
//!              │
//!              ├─ 프로필에 이메일 있음 ──► 이메일로 조회
//!              │        │
//!              │        ├─ 있음 ──► 연결: 프로바이더 ID 부착,
//!              │        │          빈 아바타 backfill ──► 사용 (3b)
//!              │        └─ 없음 ─┐
//!              │                 │
//!              └─────────────────┴──► 신규 생성: 비밀번호 없음,
//!                                     프로바이더 ID 설정 (3c)
//! ```
//!
//! 3단계는 로컬로 먼저 가입한 사용자가 같은 이메일로 프로바이더 로그인을
//! 해도 중복 계정이 생기지 않게 하며, 이메일 없는 프로바이더는
//! 프로바이더-ID 전용 계정으로 수용합니다. 동시 콜백이 생성을 경쟁하면
//! 저장소의 유니크 제약이 패자를 `Conflict`로 만듭니다.

use crate::domain::entities::user::User;
use crate::errors::AppResult;
use crate::repositories::users::user_repo::UserStore;

/// 연합 프로바이더 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
    Google,
    Line,
}

impl IdentityProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityProvider::Google => "google",
            IdentityProvider::Line => "line",
        }
    }
}

/// 프로바이더 프로필을 정규화한 외부 신원
///
/// 각 프로바이더 서비스가 자신의 프로필 스키마에서 이 형태로 변환합니다.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub provider: IdentityProvider,
    pub provider_user_id: String,
    /// 프로필 API가 이메일을 제공하지 않으면 None
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
}

impl ExternalIdentity {
    fn provider_id_of<'a>(&self, user: &'a User) -> Option<&'a str> {
        match self.provider {
            IdentityProvider::Google => user.google_id.as_deref(),
            IdentityProvider::Line => user.line_id.as_deref(),
        }
    }

    fn attach_provider_id(&self, user: &mut User) {
        match self.provider {
            IdentityProvider::Google => user.google_id = Some(self.provider_user_id.clone()),
            IdentityProvider::Line => user.line_id = Some(self.provider_user_id.clone()),
        }
    }
}

/// 외부 신원을 로컬 사용자 레코드로 정합합니다.
///
/// 반환된 사용자는 항상 저장소에 존재하며 프로바이더 ID가 연결되어 있습니다.
pub async fn find_or_link_or_create(
    store: &dyn UserStore,
    identity: &ExternalIdentity,
) -> AppResult<User> {
    // (a) 프로바이더 ID로 기존 사용자 조회
    let existing = match identity.provider {
        IdentityProvider::Google => store.find_by_google_id(&identity.provider_user_id).await?,
        IdentityProvider::Line => store.find_by_line_id(&identity.provider_user_id).await?,
    };

    if let Some(mut user) = existing {
        debug_assert_eq!(
            identity.provider_id_of(&user),
            Some(identity.provider_user_id.as_str())
        );

        // (4) 빈 필드 backfill — 변경이 있을 때만 저장
        let mut updated = false;

        if user.first_name.is_empty() && !identity.first_name.is_empty() {
            user.first_name = identity.first_name.clone();
            updated = true;
        }
        if user.last_name.is_empty() && !identity.last_name.is_empty() {
            user.last_name = identity.last_name.clone();
            updated = true;
        }
        // 아바타는 새 값이 있고 달라진 경우에만 덮어씁니다 (비우지는 않음)
        if !identity.avatar_url.is_empty() && user.avatar_url != identity.avatar_url {
            user.avatar_url = identity.avatar_url.clone();
            updated = true;
        }

        if updated {
            user.touch();
            store.update(&user).await?;
        }

        return Ok(user);
    }

    // (b) 이메일 일치 사용자에게 프로바이더 ID 연결
    if let Some(email) = identity.email.as_deref().filter(|e| !e.is_empty()) {
        if let Some(mut user) = store.find_by_email(email).await? {
            identity.attach_provider_id(&mut user);
            if user.avatar_url.is_empty() {
                user.avatar_url = identity.avatar_url.clone();
            }
            user.touch();
            store.update(&user).await?;

            log::info!(
                "{} 계정 연결: 기존 사용자 {}",
                identity.provider.as_str(),
                user.id_string().unwrap_or_default()
            );
            return Ok(user);
        }
    }

    // (c) 신규 연합 사용자 생성 (비밀번호 없음)
    let mut user = User::new_federated(
        identity.email.clone(),
        identity.first_name.clone(),
        identity.last_name.clone(),
        identity.avatar_url.clone(),
    );
    identity.attach_provider_id(&mut user);

    let user = store.create(user).await?;
    log::info!(
        "새 {} 사용자 등록: {}",
        identity.provider.as_str(),
        user.id_string().unwrap_or_default()
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::users::memory::InMemoryUserStore;

    fn google_identity() -> ExternalIdentity {
        ExternalIdentity {
            provider: IdentityProvider::Google,
            provider_user_id: "g-108555".to_string(),
            email: Some("a@x.com".to_string()),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            avatar_url: "https://lh3.googleusercontent.com/pic".to_string(),
        }
    }

    fn line_identity() -> ExternalIdentity {
        ExternalIdentity {
            provider: IdentityProvider::Line,
            provider_user_id: "U4af4980629".to_string(),
            email: None,
            first_name: "Brown".to_string(),
            last_name: String::new(),
            avatar_url: "https://profile.line-scdn.net/pic".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_first_login_creates_single_passwordless_user() {
        let store = InMemoryUserStore::new();

        let user = find_or_link_or_create(&store, &line_identity()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(user.password_hash.is_none());
        assert!(user.email.is_none());
        assert_eq!(user.line_id.as_deref(), Some("U4af4980629"));
    }

    #[actix_web::test]
    async fn test_second_login_reuses_same_user() {
        let store = InMemoryUserStore::new();

        let first = find_or_link_or_create(&store, &line_identity()).await.unwrap();
        let second = find_or_link_or_create(&store, &line_identity()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(first.id, second.id);
    }

    #[actix_web::test]
    async fn test_matching_email_links_instead_of_creating() {
        let store = InMemoryUserStore::new();
        let local = store.seed(User::new_local(
            "a@x.com".to_string(),
            None,
            "$2b$12$hash".to_string(),
            "Jo".to_string(),
            "Doe".to_string(),
        ));

        let linked = find_or_link_or_create(&store, &google_identity()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(linked.id, local.id);
        assert_eq!(linked.google_id.as_deref(), Some("g-108555"));
        // 로컬 비밀번호는 유지됩니다
        assert!(linked.password_hash.is_some());
        // 비어 있던 아바타는 backfill
        assert_eq!(linked.avatar_url, "https://lh3.googleusercontent.com/pic");
    }

    #[actix_web::test]
    async fn test_backfills_empty_names_on_repeat_login() {
        let store = InMemoryUserStore::new();
        let mut stripped = line_identity();
        stripped.first_name = String::new();
        stripped.avatar_url = String::new();

        let created = find_or_link_or_create(&store, &stripped).await.unwrap();
        assert!(created.first_name.is_empty());

        let refreshed = find_or_link_or_create(&store, &line_identity()).await.unwrap();
        assert_eq!(refreshed.id, created.id);
        assert_eq!(refreshed.first_name, "Brown");
        assert_eq!(refreshed.avatar_url, "https://profile.line-scdn.net/pic");
    }

    #[actix_web::test]
    async fn test_avatar_overwritten_only_when_changed() {
        let store = InMemoryUserStore::new();
        find_or_link_or_create(&store, &google_identity()).await.unwrap();

        let mut rotated = google_identity();
        rotated.avatar_url = "https://lh3.googleusercontent.com/new-pic".to_string();
        let user = find_or_link_or_create(&store, &rotated).await.unwrap();
        assert_eq!(user.avatar_url, "https://lh3.googleusercontent.com/new-pic");

        // 프로필이 아바타를 비워 와도 기존 값을 지우지 않습니다
        let mut empty = google_identity();
        empty.avatar_url = String::new();
        let user = find_or_link_or_create(&store, &empty).await.unwrap();
        assert_eq!(user.avatar_url, "https://lh3.googleusercontent.com/new-pic");
    }

    #[actix_web::test]
    async fn test_existing_names_are_not_overwritten() {
        let store = InMemoryUserStore::new();
        store.seed(User::new_local(
            "a@x.com".to_string(),
            None,
            "$2b$12$hash".to_string(),
            "Original".to_string(),
            "Name".to_string(),
        ));

        find_or_link_or_create(&store, &google_identity()).await.unwrap();
        let user = find_or_link_or_create(&store, &google_identity()).await.unwrap();

        assert_eq!(user.first_name, "Original");
        assert_eq!(user.last_name, "Name");
    }
}
