mod auth_handler;
mod common_handler;
mod friend_handler;
mod post_handler;
mod user_handler;

use actix_web::{HttpRequest, web};
use biz_service::manager::auth_manager::{AuthManager, AuthManagerOpt};
use common::UserId;
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    common_handler::configure(cfg);
    auth_handler::configure(cfg);
    user_handler::configure(cfg);
    friend_handler::configure(cfg);
    post_handler::configure(cfg);
}

/// 从请求头取会话令牌并解析出已认证的操作者 uid。
/// 关系、动态等受保护接口的操作者身份一律来自令牌，不信任请求体
pub async fn auth_actor(req: &HttpRequest) -> Result<UserId, AppError> {
    let token = req
        .headers()
        .get("token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("缺少令牌".to_string()))?;
    AuthManager::get().verify_token(token).await
}
