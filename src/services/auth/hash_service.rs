//! 비밀번호 해시 서비스
//!
//! bcrypt 기반의 단방향 적응형 해시를 제공합니다.
//! 해시 실패는 호출 연산 전체를 실패시키지만, 검증은 절대 실패하지 않습니다 —
//! 손상된 다이제스트는 단순히 `false`로 검증됩니다.

use crate::errors::{AppError, AppResult};

/// 비밀번호 해시/검증 계약
pub trait HashService: Send + Sync {
    /// 비밀번호를 솔트 포함 bcrypt 다이제스트로 해시합니다.
    fn hash(&self, password: &str) -> AppResult<String>;

    /// 비밀번호를 다이제스트와 대조합니다.
    ///
    /// bcrypt 비교는 일치 여부 신호에 대해 상수 시간입니다.
    /// 손상된 다이제스트는 `false`를 반환합니다.
    fn verify(&self, password: &str, digest: &str) -> bool;
}

/// bcrypt 구현체 (비용 계수는 라이브러리 기본값 고정)
#[derive(Default)]
pub struct BcryptHashService;

impl BcryptHashService {
    pub fn new() -> Self {
        Self
    }
}

impl HashService for BcryptHashService {
    fn hash(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해시 실패: {}", e)))
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        bcrypt::verify(password, digest).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let service = BcryptHashService::new();
        let digest = service.hash("pw123456").unwrap();

        assert!(service.verify("pw123456", &digest));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let service = BcryptHashService::new();
        let digest = service.hash("pw123456").unwrap();

        assert!(!service.verify("other-password", &digest));
    }

    #[test]
    fn test_verify_malformed_digest_is_false() {
        let service = BcryptHashService::new();

        // 검증은 절대 실패하지 않고 false로 수렴해야 합니다
        assert!(!service.verify("pw123456", "not-a-bcrypt-digest"));
        assert!(!service.verify("pw123456", ""));
    }

    #[test]
    fn test_hash_is_salted() {
        let service = BcryptHashService::new();
        let first = service.hash("pw123456").unwrap();
        let second = service.hash("pw123456").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("pw123456", &first));
        assert!(service.verify("pw123456", &second));
    }
}
