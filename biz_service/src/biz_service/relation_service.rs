use crate::entitys::user_entity::UserEntity;
use crate::relation::{RelationIntent, RelationOutcome, RelationState, apply_intent, derive_state};
use common::UserId;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::date_util::now;
use dashmap::DashMap;
use futures::try_join;
use mongodb::{Database, bson::doc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// 迁移后单侧用户的关系集合快照，返回给调用方渲染
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationSideView {
    pub uid: UserId,
    pub friends: Vec<UserId>,
    pub friend_requests: Vec<UserId>,
    pub sent_requests: Vec<UserId>,
}

impl RelationSideView {
    fn from_entity(user: &UserEntity) -> Self {
        Self {
            uid: user.id.clone(),
            friends: user.friends.clone(),
            friend_requests: user.friend_requests.clone(),
            sent_requests: user.sent_requests.clone(),
        }
    }
}

/// 一次关系操作的完整应答
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationReply {
    pub outcome: RelationOutcome,
    pub state: RelationState,
    pub actor: RelationSideView,
    pub other: RelationSideView,
}

/// 好友关系服务：加载双方记录、调用关系引擎、按序落盘。
///
/// 同一对用户的并发操作会发生经典的丢失更新（双方同时读到 None、
/// 各自新建请求、互发检测失效），因此这里对每一对用户加临界区，
/// 锁键用 min/max 排序拼出，保证两端请求竞争同一把锁且无死锁
#[derive(Debug)]
pub struct RelationService {
    pub dao: BaseRepository<UserEntity>,
    pair_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RelationService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("user_info");
        Self { dao: BaseRepository::new(collection), pair_locks: DashMap::new() }
    }

    fn pair_key(a: &str, b: &str) -> String {
        if a <= b { format!("{}:{}", a, b) } else { format!("{}:{}", b, a) }
    }

    /// 执行一次关系意图。引擎判定成功后，两份补丁按
    /// 授予先对方、撤销先自己的次序逐条落盘
    pub async fn apply(&self, actor_id: &UserId, other_id: &UserId, intent: RelationIntent) -> Result<RelationReply, AppError> {
        let lock = self.pair_locks.entry(Self::pair_key(actor_id, other_id)).or_insert_with(|| Arc::new(Mutex::new(()))).clone();
        let _guard = lock.lock().await;

        let (actor, other) = try_join!(self.dao.find_by_id(actor_id), self.dao.find_by_id(other_id))?;

        let transition = apply_intent(actor_id, other_id, intent, actor.as_ref(), other.as_ref())?;

        let update_time = now();
        for patch in transition.persist_sequence() {
            self.dao.update_one(doc! { "id": &patch.uid }, patch.to_update_document(update_time)).await?;
        }

        // 拒绝在上面已经短路，走到这里双方记录必然都在
        let mut actor = actor.unwrap_or_default();
        let mut other = other.unwrap_or_default();
        transition.actor_patch.apply_to(&mut actor);
        transition.other_patch.apply_to(&mut other);

        Ok(RelationReply {
            outcome: transition.outcome,
            state: transition.next_state,
            actor: RelationSideView::from_entity(&actor),
            other: RelationSideView::from_entity(&other),
        })
    }

    /// 只读：当前是否为好友
    pub async fn is_friend(&self, uid: &UserId, friend_id: &UserId) -> Result<bool, AppError> {
        let (a, b) = try_join!(self.dao.find_by_id(uid), self.dao.find_by_id(friend_id))?;
        match (a, b) {
            (Some(a), Some(b)) => Ok(derive_state(uid, friend_id, &a, &b) == RelationState::Friends),
            _ => Err(AppError::NotFound),
        }
    }

    /// 只读：好友 ID 列表
    pub async fn get_friends(&self, uid: &UserId) -> Result<Vec<UserId>, AppError> {
        let user = self.dao.find_by_id(uid).await?.ok_or(AppError::NotFound)?;
        Ok(user.friends)
    }

    pub fn init(db: Database) {
        let instance = Self::new(db);
        INSTANCE.set(Arc::new(instance)).expect("RelationService already initialized");
    }

    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("RelationService is not initialized").clone()
    }
}

static INSTANCE: OnceCell<Arc<RelationService>> = OnceCell::new();

#[cfg(test)]
mod tests {
    use super::RelationService;
    use crate::biz_service::post_service::PostService;
    use crate::biz_service::user_service::UserService;
    use crate::manager::auth_manager::AuthManager;
    use std::fmt::Debug;

    fn assert_debug<T: Debug>() {}

    /// 各单例的 init 通过 expect 报告重复初始化，
    /// OnceCell::set 的错误值要求服务类型实现 Debug
    #[test]
    fn singleton_services_implement_debug() {
        assert_debug::<UserService>();
        assert_debug::<RelationService>();
        assert_debug::<PostService>();
        assert_debug::<AuthManager>();
    }
}
