use crate::entitys::user_entity::UserEntity;
use common::UserId;
use common::errors::AppError;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// 调用方请求的动作。与最终发生的状态迁移是两回事：
/// 对方已先发出请求时，propose 会直接促成好友关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationIntent {
    Propose,
    Accept,
    Decline,
}

/// 两个用户之间的逻辑关系状态，从双方记录推导，不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationState {
    None,
    /// 当前操作者已向对方发出请求
    PendingActorToOther,
    /// 对方已向当前操作者发出请求
    PendingOtherToActor,
    Friends,
}

/// 一次成功迁移对外的结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationOutcome {
    RequestCreated,
    RequestWithdrawn,
    BecameFriends,
    RequestDeclined,
    Unfriended,
}

impl RelationOutcome {
    /// 授予型迁移（新建请求、成为好友）先落对方记录，
    /// 撤销型迁移（撤回、拒绝、删除好友）先落操作者记录。
    /// 两条记录之间没有事务，半途失败时宁可少承诺也不多承诺
    pub fn persist_order(&self) -> PersistOrder {
        match self {
            RelationOutcome::RequestCreated | RelationOutcome::BecameFriends => PersistOrder::OtherFirst,
            RelationOutcome::RequestWithdrawn | RelationOutcome::RequestDeclined | RelationOutcome::Unfriended => {
                PersistOrder::ActorFirst
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOrder {
    ActorFirst,
    OtherFirst,
}

/// 迁移被拒绝的具体原因；引擎不重试、不记日志，原样返回给调用层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("user not found")]
    NotFound,
    #[error("cannot reference self")]
    SelfReference,
    #[error("no pending request")]
    NoPendingRequest,
    #[error("already friends")]
    AlreadyFriends,
}

impl From<Rejection> for AppError {
    fn from(r: Rejection) -> Self {
        match r {
            Rejection::NotFound => AppError::NotFound,
            Rejection::SelfReference => AppError::SelfReference,
            Rejection::NoPendingRequest => AppError::NoPendingRequest,
            Rejection::AlreadyFriends => AppError::AlreadyFriends,
        }
    }
}

/// 用户记录上的三份关系集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationField {
    Friends,
    FriendRequests,
    SentRequests,
}

impl RelationField {
    pub fn as_key(&self) -> &'static str {
        match self {
            RelationField::Friends => "friends",
            RelationField::FriendRequests => "friend_requests",
            RelationField::SentRequests => "sent_requests",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Add,
    Remove,
}

/// 对某个集合字段按值增删一个 uid，永远不按下标操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOp {
    pub field: RelationField,
    pub action: ListAction,
    pub other: UserId,
}

/// 引擎为单条用户记录计算出的字段级变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPatch {
    pub uid: UserId,
    pub ops: Vec<ListOp>,
}

impl RecordPatch {
    pub fn new(uid: &str) -> Self {
        Self { uid: uid.to_string(), ops: vec![] }
    }

    pub fn add(mut self, field: RelationField, other: &str) -> Self {
        self.ops.push(ListOp { field, action: ListAction::Add, other: other.to_string() });
        self
    }

    pub fn remove(mut self, field: RelationField, other: &str) -> Self {
        self.ops.push(ListOp { field, action: ListAction::Remove, other: other.to_string() });
        self
    }

    /// 内存中应用变更。加入前检查成员资格，重复应用同一补丁不会产生重复项
    pub fn apply_to(&self, user: &mut UserEntity) {
        for op in &self.ops {
            let list = match op.field {
                RelationField::Friends => &mut user.friends,
                RelationField::FriendRequests => &mut user.friend_requests,
                RelationField::SentRequests => &mut user.sent_requests,
            };
            match op.action {
                ListAction::Add => {
                    if !list.iter().any(|id| id == &op.other) {
                        list.push(op.other.clone());
                    }
                }
                ListAction::Remove => {
                    list.retain(|id| id != &op.other);
                }
            }
        }
    }

    /// 渲染为 Mongo 更新文档：Add 用 $addToSet，Remove 用 $pull，
    /// 与内存应用同样具备幂等性
    pub fn to_update_document(&self, update_time: i64) -> Document {
        let mut add = Document::new();
        let mut pull = Document::new();
        for op in &self.ops {
            match op.action {
                ListAction::Add => {
                    add.insert(op.field.as_key(), op.other.clone());
                }
                ListAction::Remove => {
                    pull.insert(op.field.as_key(), op.other.clone());
                }
            }
        }
        let mut update = doc! { "$set": { "update_time": update_time } };
        if !add.is_empty() {
            update.insert("$addToSet", add);
        }
        if !pull.is_empty() {
            update.insert("$pull", pull);
        }
        update
    }
}

/// 一次成功迁移的完整结果：下一个状态、结果类别、双方补丁
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next_state: RelationState,
    pub outcome: RelationOutcome,
    pub actor_patch: RecordPatch,
    pub other_patch: RecordPatch,
}

impl Transition {
    /// 按落盘次序返回两份补丁
    pub fn persist_sequence(&self) -> [&RecordPatch; 2] {
        match self.outcome.persist_order() {
            PersistOrder::ActorFirst => [&self.actor_patch, &self.other_patch],
            PersistOrder::OtherFirst => [&self.other_patch, &self.actor_patch],
        }
    }
}
