//! 계정/인증 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 조립합니다.
//! MongoDB 연결과 인덱스를 준비한 뒤, 생성자 주입으로 인증 플로우를
//! 구성하고 JWT 인증 기반의 REST API를 제공합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use account_service_backend::config::AppConfig;
use account_service_backend::db::Database;
use account_service_backend::repositories::users::user_repo::{UserRepository, UserStore};
use account_service_backend::routes::configure_all_routes;
use account_service_backend::services::auth::{
    AuthService, BcryptHashService, GoogleAuthService, LineAuthService, TokenService,
};
use account_service_backend::services::storage::{S3StorageService, StorageService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 계정 서비스 시작중...");

    let config = AppConfig::from_env();

    // 데이터 스토어 초기화
    let database = match Database::new(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("데이터베이스 연결 실패: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    let user_repository = UserRepository::new(&database);
    if let Err(e) = user_repository.create_indexes().await {
        error!("인덱스 생성 실패: {}", e);
        return Err(std::io::Error::other(e));
    }

    // 의존성 조립 (생성자 주입)
    let user_store: Arc<dyn UserStore> = Arc::new(user_repository);
    let hash_service = Arc::new(BcryptHashService::new());
    let token_service = Arc::new(TokenService::new(&config.jwt));
    let storage_service: Arc<dyn StorageService> =
        Arc::new(S3StorageService::new(&config.storage).await);

    let auth_service = web::Data::new(AuthService::new(
        user_store.clone(),
        hash_service,
        token_service.clone(),
        storage_service,
    ));
    let google_service = web::Data::new(GoogleAuthService::new(
        user_store.clone(),
        token_service.clone(),
        config.google.clone(),
    ));
    let line_service = web::Data::new(LineAuthService::new(
        user_store,
        token_service.clone(),
        config.line.clone(),
    ));
    let app_config = web::Data::new(config.clone());

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    // HTTP 서버 시작
    let bind_address = config.server.bind_address();
    let frontend_url = config.server.frontend_url.clone();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    HttpServer::new(move || {
        let cors = configure_cors(&frontend_url);
        let token_service = token_service.clone();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(auth_service.clone())
            .app_data(google_service.clone())
            .app_data(line_service.clone())
            .app_data(app_config.clone())
            .configure(move |cfg| configure_all_routes(cfg, token_service))
    })
    .bind(bind_address)?
    .workers(4)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            // 기본 .env 파일 로드
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 RUST_LOG를 기반으로 로깅 레벨을 설정합니다.
/// 기본값은 info 레벨이며, actix_web은 debug 레벨로 설정됩니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정을 구성합니다
///
/// 프론트엔드 오리진과 로컬 개발 오리진을 허용합니다.
fn configure_cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
