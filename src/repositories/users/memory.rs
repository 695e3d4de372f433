//! 테스트용 인메모리 사용자 저장소
//!
//! MongoDB 저장소와 동일한 계약(소프트 삭제 제외, nullable-unique 강제)을
//! 프로세스 내에서 재현합니다. 서비스 계층 단위 테스트에서 사용합니다.

use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::domain::entities::user::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::user_repo::UserStore;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 삭제 여부와 무관하게 저장된 전체 사용자 수
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// 테스트 준비용: 사용자를 검증 없이 바로 저장합니다.
    pub fn seed(&self, mut user: User) -> User {
        if user.id.is_none() {
            user.id = Some(ObjectId::new());
        }
        self.users.lock().unwrap().push(user.clone());
        user
    }

    /// 테스트 준비용: 사용자를 소프트 삭제 처리합니다.
    pub fn mark_deleted(&self, id: &str) {
        let mut users = self.users.lock().unwrap();
        for user in users.iter_mut() {
            if user.id_string().as_deref() == Some(id) {
                user.deleted_at = Some(mongodb::bson::DateTime::now());
            }
        }
    }

    fn find_live<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| !u.is_deleted() && predicate(u))
            .cloned()
    }

    fn violates_uniqueness(users: &[User], candidate: &User) -> bool {
        users.iter().any(|existing| {
            if existing.is_deleted() || existing.id == candidate.id {
                return false;
            }
            let same = |a: &Option<String>, b: &Option<String>| {
                a.is_some() && a == b
            };
            same(&existing.email, &candidate.email)
                || same(&existing.phone_number, &candidate.phone_number)
                || same(&existing.google_id, &candidate.google_id)
                || same(&existing.line_id, &candidate.line_id)
        })
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;
        Ok(self.find_live(|u| u.id == Some(object_id)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_live(|u| u.email.as_deref() == Some(email)))
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> AppResult<Option<User>> {
        Ok(self.find_live(|u| u.phone_number.as_deref() == Some(phone_number)))
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        Ok(self.find_live(|u| u.google_id.as_deref() == Some(google_id)))
    }

    async fn find_by_line_id(&self, line_id: &str) -> AppResult<Option<User>> {
        Ok(self.find_live(|u| u.line_id.as_deref() == Some(line_id)))
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        user.id = Some(ObjectId::new());

        if Self::violates_uniqueness(users.as_slice(), &user) {
            return Err(AppError::Conflict);
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();

        if Self::violates_uniqueness(users.as_slice(), user) {
            return Err(AppError::Conflict);
        }

        for stored in users.iter_mut() {
            if stored.id == user.id {
                let mut updated = user.clone();
                updated.updated_at = mongodb::bson::DateTime::now();
                *stored = updated;
                return Ok(());
            }
        }

        Err(AppError::NotFound)
    }
}
