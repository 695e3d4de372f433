//! 프로필 핸들러
//!
//! 인증된 사용자의 프로필 조회/수정과 아바타 업로드 URL 발급입니다.
//! 모든 엔드포인트는 인증 미들웨어 뒤에 배치되며, 요청 사용자는
//! [`AuthenticatedUser`] extractor로 주입됩니다.

use actix_web::{get, post, put, web, HttpResponse};
use validator::Validate;

use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::{AvatarUploadRequest, UpdateProfileRequest};
use crate::errors::AppError;
use crate::services::auth::AuthService;

#[get("")]
pub async fn get_profile(
    user: AuthenticatedUser,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let profile = auth_service.get_profile(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[put("")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let profile = auth_service.update_profile(&user.user_id, &payload).await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[post("/avatar/upload-url")]
pub async fn avatar_upload_url(
    user: AuthenticatedUser,
    payload: web::Json<AvatarUploadRequest>,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let output = auth_service
        .generate_avatar_upload_url(&user.user_id, &payload.content_type)
        .await?;

    Ok(HttpResponse::Ok().json(output))
}
