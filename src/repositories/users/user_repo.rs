//! 사용자 저장소 (Identity Store)
//!
//! 사용자 레코드의 조회/생성/수정을 담당하는 저장소 계층입니다.
//! 비즈니스 플로우는 [`UserStore`] trait에만 의존하고,
//! MongoDB 구현체인 [`UserRepository`]가 생성자에서 주입됩니다.
//!
//! ## 조회 규칙
//!
//! 모든 조회는 소프트 삭제된 행(`deleted_at` 설정됨)을 제외합니다.
//!
//! ## 유니크 제약과 경쟁 조건
//!
//! lookup-then-create는 의도적으로 저장소 수준 제약으로 방어합니다.
//! 동일한 이메일/전화번호/프로바이더 ID로 동시에 생성이 경쟁하면
//! sparse unique 인덱스가 한쪽을 duplicate-key(11000)로 거부하고,
//! 이는 `AppError::Conflict`로 변환됩니다.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::user::User;
use crate::errors::{AppError, AppResult};

const USERS_COLLECTION: &str = "users";

/// Identity Store 계약
///
/// 모든 조회는 소프트 삭제된 행을 제외하며, 일치 항목이 없으면
/// `Ok(None)`을 반환합니다. 유니크 제약 위반은 `Conflict`입니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_phone_number(&self, phone_number: &str) -> AppResult<Option<User>>;
    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>>;
    async fn find_by_line_id(&self, line_id: &str) -> AppResult<Option<User>>;

    /// 새 사용자를 저장하고 ID가 채워진 엔티티를 반환합니다.
    async fn create(&self, user: User) -> AppResult<User>;

    /// 기존 사용자를 전체 치환으로 갱신합니다.
    async fn update(&self, user: &User) -> AppResult<()>;
}

/// MongoDB 사용자 저장소
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_database().collection::<User>(USERS_COLLECTION),
        }
    }

    /// duplicate-key(11000) 쓰기 에러 여부 판별
    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
        )
    }

    async fn find_one(&self, filter: mongodb::bson::Document) -> AppResult<Option<User>> {
        self.collection
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 유니크/조회 인덱스를 생성합니다.
    ///
    /// nullable-unique 컬럼은 sparse 인덱스로 표현합니다. `None` 필드는
    /// 문서에서 생략되므로 인덱스 대상에서 빠지고, 값이 있는 문서끼리만
    /// 유니크가 강제됩니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let unique_sparse = |field: &str| {
            IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .sparse(true)
                        .name(format!("{}_unique", field))
                        .build(),
                )
                .build()
        };

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_indexes([
                unique_sparse("email"),
                unique_sparse("phone_number"),
                unique_sparse("google_id"),
                unique_sparse("line_id"),
                created_at_index,
            ])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!("✅ users 컬렉션 인덱스 생성 완료");
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        self.find_one(doc! { "_id": object_id, "deleted_at": null })
            .await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one(doc! { "email": email, "deleted_at": null })
            .await
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> AppResult<Option<User>> {
        self.find_one(doc! { "phone_number": phone_number, "deleted_at": null })
            .await
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        self.find_one(doc! { "google_id": google_id, "deleted_at": null })
            .await
    }

    async fn find_by_line_id(&self, line_id: &str) -> AppResult<Option<User>> {
        self.find_one(doc! { "line_id": line_id, "deleted_at": null })
            .await
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if Self::is_duplicate_key(&e) {
                AppError::Conflict
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자는 갱신할 수 없습니다".to_string()))?;

        let mut updated = user.clone();
        updated.updated_at = DateTime::now();

        self.collection
            .replace_one(doc! { "_id": id }, &updated)
            .await
            .map_err(|e| {
                if Self::is_duplicate_key(&e) {
                    AppError::Conflict
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        Ok(())
    }
}
