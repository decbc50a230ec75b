use common::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 用户信息结构体，账号信息与三份好友关系集合都存储在同一条记录上
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct UserEntity {
    /// 用户唯一 ID（字符串形式）
    pub id: UserId,
    /// 用户名（用于登录，全局唯一）
    pub name: String,
    /// 加密后的密码（md5 摘要 + 配置混淆 key）
    pub password: String,
    /// 好友集合；对称：A 的 friends 含 B 当且仅当 B 的 friends 含 A
    pub friends: Vec<UserId>,
    /// 收到的待处理好友请求（对方的 uid）
    pub friend_requests: Vec<UserId>,
    /// 发出的待处理好友请求（对方的 uid），与对方的 friend_requests 互为镜像
    pub sent_requests: Vec<UserId>,
    /// 创建时间（Unix 时间戳，秒）
    pub create_time: i64,
    /// 最后更新时间（Unix 时间戳，秒）
    pub update_time: i64,
}

impl UserEntity {
    pub fn has_friend(&self, uid: &str) -> bool {
        self.friends.iter().any(|id| id == uid)
    }

    pub fn has_incoming_request(&self, uid: &str) -> bool {
        self.friend_requests.iter().any(|id| id == uid)
    }

    pub fn has_outgoing_request(&self, uid: &str) -> bool {
        self.sent_requests.iter().any(|id| id == uid)
    }
}
