//! JWT 토큰 관리 서비스 구현
//!
//! JSON Web Token 기반의 인증 시스템을 제공합니다.
//! 액세스 토큰과 리프레시 토큰의 생성과 검증을 담당합니다.
//!
//! ## 설계 노트
//!
//! - HMAC-SHA256 대칭 서명, 발급자(`iss`) 고정 검증, leeway 0.
//! - 액세스/리프레시 토큰은 동일한 [`TokenService::issue`] 연산으로
//!   생성되며 TTL만 다릅니다. 세 인증 플로우(로컬/Google/LINE)는 모두
//!   [`TokenService::generate_token_pair`] 하나를 공유합니다.
//! - 발급자는 토큰의 "종류"를 구분하지 않으므로, 액세스 토큰 자리에
//!   리프레시 토큰을 제시하는 것은 구조적으로 막히지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::domain::models::token::{TokenClaims, TokenPair};
use crate::errors::{AppError, AppResult};

/// JWT 토큰 관리 서비스
///
/// 서명 비밀키, 발급자, 토큰 수명을 생성자에서 주입받습니다.
pub struct TokenService {
    secret: String,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            access_ttl: Duration::minutes(config.access_expiry_minutes),
            refresh_ttl: Duration::hours(config.refresh_expiry_hours),
        }
    }

    /// 주체 ID와 표시용 클레임으로 서명된 만료 토큰을 발급합니다.
    ///
    /// # Arguments
    ///
    /// * `subject_id` - 토큰 주체 (사용자 ID)
    /// * `email` - 표시용 이메일 클레임 (없으면 빈 문자열)
    /// * `ttl` - 토큰 수명
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 서명/인코딩 실패
    pub fn issue(&self, subject_id: &str, email: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();

        let claims = TokenClaims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 액세스+리프레시 토큰 쌍 발급
    ///
    /// 세 인증 플로우가 공유하는 유일한 토큰 쌍 발급 지점입니다.
    pub fn generate_token_pair(&self, subject_id: &str, email: &str) -> AppResult<TokenPair> {
        let access_token = self.issue(subject_id, email, self.access_ttl)?;
        let refresh_token = self.issue(subject_id, email, self.refresh_ttl)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// JWT 토큰 검증 및 클레임 추출
    ///
    /// # Errors
    ///
    /// * `AppError::TokenExpired` - 현재 시간이 만료 시간을 지남
    /// * `AppError::TokenInvalid` - 잘못된 서명/구조/발급자
    pub fn validate(&self, token: &str) -> AppResult<TokenClaims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid,
            })
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰 부분만을 추출합니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> AppResult<&'a str> {
        auth_header
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&JwtConfig {
            secret: "unit-test-secret".to_string(),
            issuer: "account_service".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 168,
        })
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let service = test_service();
        let token = service
            .issue("64f000000000000000000001", "a@x.com", Duration::minutes(5))
            .unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "64f000000000000000000001");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iss, "account_service");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_fails_with_token_expired() {
        let service = test_service();
        // 이미 만료된 토큰 발급 (음수 TTL)
        let token = service
            .issue("64f000000000000000000001", "a@x.com", Duration::minutes(-5))
            .unwrap();

        match service.validate(&token) {
            Err(AppError::TokenExpired) => {}
            other => panic!("Expected TokenExpired, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = test_service();

        match service.validate("not.a.jwt") {
            Err(AppError::TokenInvalid) => {}
            other => panic!("Expected TokenInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let service = test_service();
        let other = TokenService::new(&JwtConfig {
            secret: "different-secret".to_string(),
            issuer: "account_service".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 168,
        });

        let token = other
            .issue("64f000000000000000000001", "a@x.com", Duration::minutes(5))
            .unwrap();

        match service.validate(&token) {
            Err(AppError::TokenInvalid) => {}
            other => panic!("Expected TokenInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let service = test_service();
        let other = TokenService::new(&JwtConfig {
            secret: "unit-test-secret".to_string(),
            issuer: "some-other-service".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 168,
        });

        let token = other
            .issue("64f000000000000000000001", "a@x.com", Duration::minutes(5))
            .unwrap();

        match service.validate(&token) {
            Err(AppError::TokenInvalid) => {}
            other => panic!("Expected TokenInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_token_pair_has_two_valid_tokens() {
        let service = test_service();
        let pair = service
            .generate_token_pair("64f000000000000000000001", "a@x.com")
            .unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let access = service.validate(&pair.access_token).unwrap();
        let refresh = service.validate(&pair.refresh_token).unwrap();
        assert_eq!(access.sub, refresh.sub);
        // 리프레시 토큰이 더 오래 살아야 합니다
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = test_service();

        assert_eq!(service.extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
        assert!(service.extract_bearer_token("").is_err());
    }
}
