//! 외부 프로바이더 와이어 타입
//!
//! Google/LINE의 토큰 교환 응답과 프로필 응답 스키마입니다.
//! 응답 스키마는 각 프로바이더의 공개 계약을 따릅니다.

use serde::Deserialize;

/// Google 토큰 교환 응답
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Google userinfo 응답 (oauth2/v2/userinfo)
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    /// 이메일 스코프가 거부된 경우 없을 수 있습니다
    pub email: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub picture: String,
}

/// LINE 토큰 교환 응답 (oauth2/v2.1/token)
#[derive(Debug, Deserialize)]
pub struct LineTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    pub id_token: Option<String>,
}

/// LINE 프로필 응답 (v2/profile)
///
/// LINE 프로필 API는 이메일을 제공하지 않습니다.
#[derive(Debug, Deserialize)]
pub struct LineProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "pictureUrl", default)]
    pub picture_url: String,
    #[serde(rename = "statusMessage", default)]
    pub status_message: String,
}
