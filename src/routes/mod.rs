//! 라우트 설정
//!
//! 공개 인증 라우트와 JWT 보호 프로필 라우트를 구성합니다.

use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::TokenService;

/// Health check endpoint
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "account_service_backend",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub fn configure_all_routes(cfg: &mut web::ServiceConfig, token_service: Arc<TokenService>) {
    // Health check endpoint
    cfg.service(health_check);

    // 공개 인증 라우트
    cfg.service(
        web::scope("/api/v1/auth")
            // 로컬 인증
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::refresh_token)
            // Google OAuth
            .service(handlers::auth::google_login)
            .service(handlers::auth::google_callback)
            // LINE OAuth
            .service(handlers::auth::line_login)
            .service(handlers::auth::line_callback),
    );

    // 인증이 필요한 프로필 라우트
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::new(token_service))
            .service(handlers::profile::get_profile)
            .service(handlers::profile::update_profile)
            .service(handlers::profile::avatar_upload_url),
    );
}
