//! 응답 DTO
//!
//! 인증 플로우와 프로필 API가 HTTP 계층에 노출하는 출력 형태입니다.

use serde::Serialize;

use crate::domain::entities::user::User;
use crate::domain::models::token::TokenPair;

/// 사용자 응답 구조체
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
}

impl UserResponse {
    /// 엔티티로부터 응답을 구성합니다.
    ///
    /// `avatar_url`은 호출측에서 해석(프리사인 여부)을 끝낸 값을 받습니다.
    pub fn from_user(user: &User, avatar_url: String) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar_url,
        }
    }
}

/// 인증 결과 응답 구조체 (토큰 쌍 + 사용자)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, user: UserResponse) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user,
        }
    }
}

/// 아바타 업로드 URL 발급 응답 구조체
#[derive(Debug, Serialize)]
pub struct PresignUploadResponse {
    pub upload_url: String,
    pub object_key: String,
}
