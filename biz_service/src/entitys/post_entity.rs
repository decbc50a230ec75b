use common::{PostId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 动态（墙贴）结构体
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct PostEntity {
    /// 动态唯一 ID
    pub id: PostId,
    /// 文本内容
    pub content: String,
    /// 作者 uid
    pub author: UserId,
    /// 墙主 uid（发到谁的主页上）
    pub receiver: UserId,
    /// 创建时间（Unix 时间戳，秒）
    pub created_at: i64,
}
