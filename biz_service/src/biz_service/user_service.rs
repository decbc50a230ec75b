use crate::entitys::user_entity::UserEntity;
use common::UserId;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::common_utils::build_id;
use common::util::date_util::now;
use mongodb::{Database, bson::doc};
use once_cell::sync::OnceCell;
use std::sync::Arc;

#[derive(Debug)]
pub struct UserService {
    pub dao: BaseRepository<UserEntity>,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("user_info");
        Self { dao: BaseRepository::new(collection) }
    }

    /// 注册新用户；用户名全局唯一
    pub async fn create_user(&self, name: &str, password_digest: &str) -> Result<UserEntity, AppError> {
        let exists = self.dao.find_one(doc! { "name": name }).await?;
        if exists.is_some() {
            return Err(AppError::Conflict);
        }
        let time = now();
        let user = UserEntity {
            id: build_id(),
            name: name.to_string(),
            password: password_digest.to_string(),
            friends: vec![],
            friend_requests: vec![],
            sent_requests: vec![],
            create_time: time,
            update_time: time,
        };
        self.dao.insert(&user).await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, uid: &UserId) -> Result<Option<UserEntity>, AppError> {
        let user = self.dao.find_by_id(uid).await?;
        Ok(user)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<UserEntity>, AppError> {
        let user = self.dao.find_one(doc! { "name": name }).await?;
        Ok(user)
    }

    pub fn init(db: Database) {
        let instance = Self::new(db);
        INSTANCE.set(Arc::new(instance)).expect("UserService already initialized");
    }

    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("UserService is not initialized").clone()
    }
}

static INSTANCE: OnceCell<Arc<UserService>> = OnceCell::new();
