use crate::biz_service::user_service::UserService;
use crate::entitys::post_entity::PostEntity;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::common_utils::build_id;
use common::util::date_util::now;
use common::{PostId, UserId};
use mongodb::{Database, bson::doc};
use once_cell::sync::OnceCell;
use std::sync::Arc;

#[derive(Debug)]
pub struct PostService {
    pub dao: BaseRepository<PostEntity>,
}

impl PostService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("post_info");
        Self { dao: BaseRepository::new(collection) }
    }

    /// 发布墙贴。只能发到自己的主页或好友的主页
    pub async fn create_post(&self, author: &UserId, receiver: &UserId, content: &str) -> Result<PostEntity, AppError> {
        let author_user = UserService::get().find_by_id(author).await?.ok_or(AppError::NotFound)?;
        if author != receiver && !author_user.has_friend(receiver) {
            return Err(AppError::Validation("只能在好友的主页发布动态".to_string()));
        }
        let post = PostEntity {
            id: build_id(),
            content: content.to_string(),
            author: author.clone(),
            receiver: receiver.clone(),
            created_at: now(),
        };
        self.dao.insert(&post).await?;
        Ok(post)
    }

    /// 某用户主页上的全部动态
    pub async fn list_for_wall(&self, receiver: &UserId) -> Result<Vec<PostEntity>, AppError> {
        let list = self.dao.query(doc! { "receiver": receiver }).await?;
        Ok(list)
    }

    pub async fn find_by_id(&self, id: &PostId) -> Result<Option<PostEntity>, AppError> {
        let post = self.dao.find_by_id(id).await?;
        Ok(post)
    }

    pub fn init(db: Database) {
        let instance = Self::new(db);
        INSTANCE.set(Arc::new(instance)).expect("PostService already initialized");
    }

    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("PostService is not initialized").clone()
    }
}

static INSTANCE: OnceCell<Arc<PostService>> = OnceCell::new();
