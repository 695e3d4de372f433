//! 인증된 요청의 사용자 컨텍스트
//!
//! 미들웨어가 액세스 토큰 검증 후 Request Extensions에 저장하는
//! 타입이 있는 구조체입니다. 핸들러는 extractor로 꺼내 사용합니다.
//! (비정형 컨텍스트 값 조회 대신 명시적 타입으로 전달합니다.)

use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

/// 검증된 액세스 토큰에서 추출한 요청 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 ID (ObjectId hex)
    pub user_id: String,
    /// 토큰의 표시용 이메일 클레임
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다",
            ))),
        }
    }
}
