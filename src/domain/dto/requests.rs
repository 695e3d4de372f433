//! 요청 DTO
//!
//! 인증 및 프로필 API의 요청 본문/쿼리 매핑입니다.
//! 핸들러가 `validate()`를 명시적으로 호출하여 검증합니다.

use serde::Deserialize;
use validator::Validate;

/// 회원가입 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다"))]
    pub password: String,

    #[validate(length(min = 1, message = "이름을 입력해주세요"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "성을 입력해주세요"))]
    pub last_name: String,

    /// 선택 입력 — 빈 문자열이면 전화번호 없이 가입
    #[serde(default)]
    pub phone_number: String,
}

/// 로컬 로그인 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 리프레시 토큰 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

/// 프로필 수정 요청 구조체
///
/// `phone_number`/`avatar_url`의 빈 문자열은 "변경 없음"을 의미합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub phone_number: String,

    #[serde(default)]
    pub avatar_url: String,
}

/// 아바타 업로드 URL 발급 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarUploadRequest {
    #[validate(length(min = 1, message = "content_type이 필요합니다"))]
    pub content_type: String,
}

/// OAuth 콜백 쿼리 파라미터 구조체
///
/// 콜백은 브라우저 내비게이션이므로 `code`가 없거나 에러가 와도
/// JSON 에러 대신 프론트엔드로 리다이렉트합니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// 사용자가 거부했거나 프로바이더 측 에러가 발생한 경우
    pub error: Option<String>,
    pub error_description: Option<String>,
}
