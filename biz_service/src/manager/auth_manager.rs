use crate::biz_service::user_service::UserService;
use crate::entitys::user_entity::UserEntity;
use async_trait::async_trait;
use common::UserId;
use common::config::AppConfig;
use common::errors::AppError;
use common::util::common_utils::{build_id, build_password};
use moka::sync::Cache;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

/// 认证行为抽象接口
#[async_trait]
pub trait AuthManagerOpt: Send + Sync {
    /// 注册新账号，返回新用户记录
    async fn register(&self, name: &str, password: &str) -> Result<UserEntity, AppError>;
    /// 校验用户名口令，签发会话令牌
    async fn login(&self, name: &str, password: &str) -> Result<(String, UserEntity), AppError>;
    /// 注销会话令牌
    async fn logout(&self, token: &str) -> Result<(), AppError>;
    /// 校验令牌并返回其归属的用户 ID
    async fn verify_token(&self, token: &str) -> Result<UserId, AppError>;
}

/// 会话管理器。令牌为随机 uuid，存放在带 TTL 的本地缓存中；
/// 关系引擎只消费这里产出的已认证 uid
#[derive(Debug)]
pub struct AuthManager {
    token_cache: Cache<String, UserId>,
}

impl AuthManager {
    pub fn new(token_ttl_secs: u64) -> Self {
        let token_cache = Cache::builder().time_to_live(Duration::from_secs(token_ttl_secs)).build();
        Self { token_cache }
    }

    fn digest(raw: &str) -> String {
        let md5_key = AppConfig::get().get_sys().md5_key;
        build_password(&md5_key, raw)
    }

    pub fn init(token_ttl_secs: u64) {
        let instance = Self::new(token_ttl_secs);
        INSTANCE.set(Arc::new(instance)).expect("AuthManager already initialized");
    }

    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("AuthManager is not initialized").clone()
    }
}

#[async_trait]
impl AuthManagerOpt for AuthManager {
    async fn register(&self, name: &str, password: &str) -> Result<UserEntity, AppError> {
        let user = UserService::get().create_user(name, &Self::digest(password)).await?;
        Ok(user)
    }

    async fn login(&self, name: &str, password: &str) -> Result<(String, UserEntity), AppError> {
        let user = UserService::get().find_by_name(name).await?.ok_or(AppError::NotFound)?;
        if user.password != Self::digest(password) {
            return Err(AppError::Unauthorized("用户名或密码错误".to_string()));
        }
        let token = build_id();
        self.token_cache.insert(token.clone(), user.id.clone());
        Ok((token, user))
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.token_cache.invalidate(token);
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<UserId, AppError> {
        self.token_cache.get(token).ok_or_else(|| AppError::Unauthorized("无效或过期的令牌".to_string()))
    }
}

static INSTANCE: OnceCell<Arc<AuthManager>> = OnceCell::new();
