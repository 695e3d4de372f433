//! 오브젝트 스토리지 서비스 모듈

pub mod s3_service;

pub use s3_service::{S3StorageService, StorageService};
