//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 인증(이메일/비밀번호)과 연합 인증(Google, LINE)을 모두 지원하는
//! 통합된 사용자 모델을 제공합니다.
//!
//! ## 유니크 제약
//!
//! `email`, `phone_number`, `google_id`, `line_id`는 모두 nullable-unique입니다.
//! `None`인 필드는 문서에서 아예 생략되어(sparse index) 여러 사용자가 값 없이
//! 공존할 수 있고, 값이 있는 경우에만 저장소의 유니크 인덱스가 적용됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// 연합 가입 사용자는 이메일/전화번호/비밀번호가 전혀 없을 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (nullable-unique)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 전화번호 (nullable-unique)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// 해시된 비밀번호 (연합 전용 계정의 경우 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// 이름
    #[serde(default)]
    pub first_name: String,
    /// 성
    #[serde(default)]
    pub last_name: String,
    /// 아바타: 빈 문자열, 절대 URL(`http...`), 또는 스토리지 오브젝트 키
    #[serde(default)]
    pub avatar_url: String,
    /// Google 프로바이더 사용자 ID (nullable-unique)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    /// LINE 프로바이더 사용자 ID (nullable-unique)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
    /// 소프트 삭제 마커 — 설정되면 모든 조회에서 제외
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/비밀번호)
    pub fn new_local(
        email: String,
        phone_number: Option<String>,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email: Some(email),
            phone_number,
            password_hash: Some(password_hash),
            first_name,
            last_name,
            avatar_url: String::new(),
            google_id: None,
            line_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// 새 연합 사용자 생성 (프로바이더 프로필 기반, 비밀번호 없음)
    ///
    /// 이메일을 제공하지 않는 프로바이더(LINE 프로필 API 등)의 경우
    /// `email`은 `None`으로 저장됩니다.
    pub fn new_federated(
        email: Option<String>,
        first_name: String,
        last_name: String,
        avatar_url: String,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email: email.filter(|e| !e.is_empty()),
            phone_number: None,
            password_hash: None,
            first_name,
            last_name,
            avatar_url,
            google_id: None,
            line_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// ID 문자열(hex)로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 소프트 삭제된 계정인지 확인
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// 수정 시간을 현재로 갱신
    pub fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_local_user() {
        let user = User::new_local(
            "a@x.com".to_string(),
            Some("+15551234567".to_string()),
            "$2b$12$hash".to_string(),
            "Jo".to_string(),
            "Doe".to_string(),
        );

        assert_eq!(user.email.as_deref(), Some("a@x.com"));
        assert_eq!(user.phone_number.as_deref(), Some("+15551234567"));
        assert!(user.can_authenticate_with_password());
        assert!(user.google_id.is_none());
        assert!(user.line_id.is_none());
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_new_federated_user_without_email() {
        let user = User::new_federated(
            None,
            "Taro".to_string(),
            String::new(),
            "https://profile.line-scdn.net/pic".to_string(),
        );

        assert!(user.email.is_none());
        assert!(user.password_hash.is_none());
        assert!(!user.can_authenticate_with_password());
    }

    #[test]
    fn test_new_federated_user_empty_email_is_none() {
        // 빈 문자열 이메일은 null로 정규화되어야 유니크 인덱스와 충돌하지 않습니다
        let user = User::new_federated(
            Some(String::new()),
            "Jo".to_string(),
            "Doe".to_string(),
            String::new(),
        );

        assert!(user.email.is_none());
    }
}
