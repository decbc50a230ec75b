use crate::handlers::auth_actor;
use crate::result::{ApiResponse, result_data};
use actix_web::{HttpRequest, Responder, post, web};
use biz_service::biz_service::relation_service::{RelationReply, RelationService};
use biz_service::relation::RelationIntent;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(friend_propose);
    cfg.service(friend_accept);
    cfg.service(friend_decline);
    cfg.service(friend_check);
    cfg.service(friend_list);
}

/// 关系操作只携带对方 uid；操作者身份取自令牌，
/// 意图由端点本身决定，不接受任意字段补丁
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendIntentDto {
    #[validate(length(min = 1, max = 64, message = "对方ID不能为空，长度为1~64"))]
    pub other_id: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct FriendCheckDto {
    pub friend_id: String,
}

async fn apply(req: &HttpRequest, dto: &FriendIntentDto, intent: RelationIntent) -> Result<RelationReply, AppError> {
    dto.validate()?;
    let actor_id = auth_actor(req).await?;
    RelationService::get().apply(&actor_id, &dto.other_id, intent).await
}

#[utoipa::path(
    post,
    path = "/user/friend/propose",
    tag = "好友-关系",
    summary = "发起好友请求（重复调用即撤回；对方已先发出则直接成为好友；已是好友则删除好友）",
    request_body = FriendIntentDto,
    responses((status = 200, description = "成功", body = ApiResponse<RelationReply>))
)]
#[post("/user/friend/propose")]
async fn friend_propose(dto: web::Json<FriendIntentDto>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let reply = apply(&req, &dto, RelationIntent::Propose).await?;
    Ok(web::Json(result_data(reply)))
}

#[utoipa::path(
    post,
    path = "/user/friend/accept",
    tag = "好友-关系",
    summary = "接受收到的好友请求",
    request_body = FriendIntentDto,
    responses((status = 200, description = "成功", body = ApiResponse<RelationReply>))
)]
#[post("/user/friend/accept")]
async fn friend_accept(dto: web::Json<FriendIntentDto>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let reply = apply(&req, &dto, RelationIntent::Accept).await?;
    Ok(web::Json(result_data(reply)))
}

#[utoipa::path(
    post,
    path = "/user/friend/decline",
    tag = "好友-关系",
    summary = "拒绝收到的好友请求",
    request_body = FriendIntentDto,
    responses((status = 200, description = "成功", body = ApiResponse<RelationReply>))
)]
#[post("/user/friend/decline")]
async fn friend_decline(dto: web::Json<FriendIntentDto>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let reply = apply(&req, &dto, RelationIntent::Decline).await?;
    Ok(web::Json(result_data(reply)))
}

#[utoipa::path(
    post,
    path = "/user/friend/check",
    tag = "好友-关系",
    summary = "检查是否为好友",
    request_body = FriendCheckDto,
    responses((status = 200, description = "true/false", body = ApiResponse<bool>))
)]
#[post("/user/friend/check")]
async fn friend_check(dto: web::Json<FriendCheckDto>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let actor_id = auth_actor(&req).await?;
    let result = RelationService::get().is_friend(&actor_id, &dto.friend_id).await?;
    Ok(web::Json(result_data(result)))
}

#[utoipa::path(
    post,
    path = "/user/friend/list",
    tag = "好友-关系",
    summary = "获取好友列表",
    responses((status = 200, description = "好友 ID 列表", body = ApiResponse<Vec<String>>))
)]
#[post("/user/friend/list")]
async fn friend_list(req: HttpRequest) -> Result<impl Responder, AppError> {
    let actor_id = auth_actor(&req).await?;
    let list = RelationService::get().get_friends(&actor_id).await?;
    Ok(web::Json(result_data(list)))
}
