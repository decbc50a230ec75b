use crate::handlers::auth_actor;
use crate::result::{ApiResponse, result_data};
use actix_web::{HttpRequest, Responder, get, web};
use biz_service::biz_service::user_service::UserService;
use biz_service::entitys::user_entity::UserEntity;
use common::UserId;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(user_find);
    cfg.service(user_get);
}

/// 对外的用户视图：口令摘要不出网，三份关系集合原样给出
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: UserId,
    pub name: String,
    pub friends: Vec<UserId>,
    pub friend_requests: Vec<UserId>,
    pub sent_requests: Vec<UserId>,
}

impl UserProfileDto {
    fn from_entity(user: UserEntity) -> Self {
        Self {
            id: user.id,
            name: user.name,
            friends: user.friends,
            friend_requests: user.friend_requests,
            sent_requests: user.sent_requests,
        }
    }
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "用户",
    summary = "按 ID 查询用户",
    responses((status = 200, description = "成功", body = ApiResponse<UserProfileDto>))
)]
#[get("/user/{id}")]
async fn user_get(path: web::Path<String>, req: HttpRequest) -> Result<impl Responder, AppError> {
    auth_actor(&req).await?;
    let user = UserService::get().find_by_id(&path.into_inner()).await?.ok_or(AppError::NotFound)?;
    Ok(web::Json(result_data(UserProfileDto::from_entity(user))))
}

#[utoipa::path(
    get,
    path = "/user/find/{name}",
    tag = "用户",
    summary = "按用户名查询用户",
    responses((status = 200, description = "成功", body = ApiResponse<UserProfileDto>))
)]
#[get("/user/find/{name}")]
async fn user_find(path: web::Path<String>, req: HttpRequest) -> Result<impl Responder, AppError> {
    auth_actor(&req).await?;
    let user = UserService::get().find_by_name(&path.into_inner()).await?.ok_or(AppError::NotFound)?;
    Ok(web::Json(result_data(UserProfileDto::from_entity(user))))
}
