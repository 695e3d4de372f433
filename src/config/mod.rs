//! # Configuration Module
//!
//! 계정 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 기동 시점에 한 번 읽어 `AppConfig` 값으로
//! 구체화하고, 각 컴포넌트의 생성자에 명시적으로 주입합니다.
//! 비즈니스 코드에서 환경 변수를 직접 조회하지 않습니다.
//!
//! ## 환경 변수 설정 가이드
//!
//! ### 필수 환경 변수 (프로덕션)
//!
//! ```bash
//! # JWT 설정
//! export JWT_SECRET="your-super-secret-key"
//!
//! # Google OAuth
//! export GOOGLE_CLIENT_ID="your-client-id"
//! export GOOGLE_CLIENT_SECRET="your-client-secret"
//! export GOOGLE_REDIRECT_URI="https://yourdomain.com/api/v1/auth/google/callback"
//!
//! # LINE OAuth
//! export LINE_CHANNEL_ID="your-channel-id"
//! export LINE_CHANNEL_SECRET="your-channel-secret"
//! export LINE_REDIRECT_URI="https://yourdomain.com/api/v1/auth/line/callback"
//!
//! # S3 스토리지
//! export S3_BUCKET="your-avatar-bucket"
//! ```
//!
//! ### 선택적 환경 변수
//!
//! ```bash
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export FRONTEND_URL="https://yourapp.com"
//! export JWT_ACCESS_EXPIRY_MINUTES="15"
//! export JWT_REFRESH_EXPIRY_HOURS="168"
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="account_service_dev"
//! export S3_REGION="ap-northeast-1"
//! export S3_PRESIGN_EXPIRY_SECONDS="900"
//! export OAUTH_HTTP_TIMEOUT_SECONDS="10"
//! ```

use std::env;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// HTTP 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// OAuth 콜백 이후 브라우저를 돌려보낼 프론트엔드 기본 URL
    pub frontend_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse_or("PORT", 8080),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MongoDB 연결 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database_name: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            uri: env_or("MONGODB_URI", "mongodb://localhost:27017"),
            database_name: env_or("DATABASE_NAME", "account_service_dev"),
        }
    }
}

/// JWT 인증 설정
///
/// 액세스 토큰은 분 단위, 리프레시 토큰은 시간 단위 수명을 가집니다.
/// 두 토큰 모두 동일한 발급 연산으로 생성되며 TTL만 다릅니다.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_hours: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        });

        Self {
            secret,
            issuer: env_or("JWT_ISSUER", "account_service"),
            access_expiry_minutes: env_parse_or("JWT_ACCESS_EXPIRY_MINUTES", 15),
            refresh_expiry_hours: env_parse_or("JWT_REFRESH_EXPIRY_HOURS", 168),
        }
    }
}

/// Google OAuth 2.0 설정
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub http_timeout_seconds: u64,
}

impl GoogleOAuthConfig {
    pub fn from_env() -> Self {
        let client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_else(|_| {
            log::warn!("GOOGLE_CLIENT_ID not set, Google login will fail");
            String::new()
        });

        Self {
            client_id,
            client_secret: env_or("GOOGLE_CLIENT_SECRET", ""),
            redirect_uri: env_or(
                "GOOGLE_REDIRECT_URI",
                "http://localhost:8080/api/v1/auth/google/callback",
            ),
            auth_uri: env_or(
                "GOOGLE_AUTH_URI",
                "https://accounts.google.com/o/oauth2/auth",
            ),
            token_uri: env_or("GOOGLE_TOKEN_URI", "https://oauth2.googleapis.com/token"),
            userinfo_uri: env_or(
                "GOOGLE_USERINFO_URI",
                "https://www.googleapis.com/oauth2/v2/userinfo",
            ),
            http_timeout_seconds: env_parse_or("OAUTH_HTTP_TIMEOUT_SECONDS", 10),
        }
    }
}

/// LINE Login (OAuth 2.1) 설정
#[derive(Debug, Clone)]
pub struct LineOAuthConfig {
    pub channel_id: String,
    pub channel_secret: String,
    pub redirect_uri: String,
    pub http_timeout_seconds: u64,
}

impl LineOAuthConfig {
    pub fn from_env() -> Self {
        let channel_id = env::var("LINE_CHANNEL_ID").unwrap_or_else(|_| {
            log::warn!("LINE_CHANNEL_ID not set, LINE login will fail");
            String::new()
        });

        Self {
            channel_id,
            channel_secret: env_or("LINE_CHANNEL_SECRET", ""),
            redirect_uri: env_or(
                "LINE_REDIRECT_URI",
                "http://localhost:8080/api/v1/auth/line/callback",
            ),
            http_timeout_seconds: env_parse_or("OAUTH_HTTP_TIMEOUT_SECONDS", 10),
        }
    }
}

/// S3 오브젝트 스토리지 설정
///
/// access_key/secret_key가 비어 있으면 AWS 기본 자격 증명 체인
/// (IAM Role, 환경 변수, 공유 설정)을 사용합니다.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub presign_expiry_seconds: u64,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let bucket = env::var("S3_BUCKET").unwrap_or_else(|_| {
            log::warn!("S3_BUCKET not set, presigned avatar URLs will fail");
            String::new()
        });

        Self {
            region: env_or("S3_REGION", "ap-northeast-1"),
            bucket,
            access_key: env_or("S3_ACCESS_KEY", ""),
            secret_key: env_or("S3_SECRET_KEY", ""),
            presign_expiry_seconds: env_parse_or("S3_PRESIGN_EXPIRY_SECONDS", 900),
        }
    }
}

/// 애플리케이션 전체 설정
///
/// 기동 시점에 한 번 구성되어 의존성 조립(생성자 주입)에 사용됩니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub google: GoogleOAuthConfig,
    pub line: LineOAuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            google: GoogleOAuthConfig::from_env(),
            line: LineOAuthConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}
