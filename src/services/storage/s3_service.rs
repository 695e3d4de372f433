//! S3 오브젝트 스토리지 서비스
//!
//! 아바타 블롭에 대한 프리사인 업로드/다운로드 URL을 생성합니다.
//! 저장소 자체는 외부 협력자이며, 이 서비스는 URL 발급만 담당합니다.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};

/// 오브젝트 스토리지 게이트웨이 계약
///
/// 두 연산 모두 프로바이더 측 실패 시 일반 스토리지 에러로 실패합니다.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// 프리사인 PUT URL 생성
    async fn generate_upload_url(&self, key: &str, content_type: &str) -> AppResult<String>;

    /// 프리사인 GET URL 생성
    async fn generate_download_url(&self, key: &str) -> AppResult<String>;
}

/// S3 구현체
pub struct S3StorageService {
    client: Client,
    bucket: String,
    presign_expiry: Duration,
}

impl S3StorageService {
    /// 설정으로부터 S3 클라이언트를 구성합니다.
    ///
    /// 액세스 키가 설정되어 있으면 정적 자격 증명을, 아니면 기본 자격 증명
    /// 체인(IAM Role, 환경 변수, 공유 설정)을 사용합니다.
    pub async fn new(config: &StorageConfig) -> Self {
        let region = Region::new(config.region.clone());

        let s3_config = if !config.access_key.is_empty() && !config.secret_key.is_empty() {
            let credentials = Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "static",
            );

            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(credentials)
                .build()
        } else {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;

            aws_sdk_s3::Config::new(&shared)
        };

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            presign_expiry: Duration::from_secs(config.presign_expiry_seconds),
        }
    }

    fn presigning_config(&self) -> AppResult<PresigningConfig> {
        PresigningConfig::expires_in(self.presign_expiry)
            .map_err(|e| AppError::StorageError(format!("프리사인 설정 오류: {}", e)))
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn generate_upload_url(&self, key: &str, content_type: &str) -> AppResult<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(self.presigning_config()?)
            .await
            .map_err(|e| AppError::StorageError(format!("프리사인 PUT 생성 실패: {}", e)))?;

        Ok(presigned.uri().to_string())
    }

    async fn generate_download_url(&self, key: &str) -> AppResult<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(self.presigning_config()?)
            .await
            .map_err(|e| AppError::StorageError(format!("프리사인 GET 생성 실패: {}", e)))?;

        Ok(presigned.uri().to_string())
    }
}
