use crate::handlers::auth_actor;
use crate::result::{ApiResponse, result_data, result_list};
use actix_web::{HttpRequest, Responder, get, post, web};
use biz_service::biz_service::post_service::PostService;
use biz_service::entitys::post_entity::PostEntity;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(post_create);
    cfg.service(post_list);
    cfg.service(post_get);
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostCreateDto {
    #[validate(length(min = 1, max = 2000, message = "内容不能为空，长度为1~2000"))]
    pub content: String,

    #[validate(length(min = 1, max = 64, message = "墙主ID不能为空，长度为1~64"))]
    pub receiver: String,
}

#[utoipa::path(
    post,
    path = "/post/create",
    tag = "动态",
    summary = "发布动态（自己的主页或好友的主页）",
    request_body = PostCreateDto,
    responses((status = 200, description = "成功", body = ApiResponse<PostEntity>))
)]
#[post("/post/create")]
async fn post_create(dto: web::Json<PostCreateDto>, req: HttpRequest) -> Result<impl Responder, AppError> {
    dto.validate()?;
    let author = auth_actor(&req).await?;
    let post = PostService::get().create_post(&author, &dto.receiver, &dto.content).await?;
    Ok(web::Json(result_data(post)))
}

#[utoipa::path(
    get,
    path = "/post/list/{uid}",
    tag = "动态",
    summary = "某用户主页上的动态列表",
    responses((status = 200, description = "成功", body = ApiResponse<Vec<PostEntity>>))
)]
#[get("/post/list/{uid}")]
async fn post_list(path: web::Path<String>, req: HttpRequest) -> Result<impl Responder, AppError> {
    auth_actor(&req).await?;
    let list = PostService::get().list_for_wall(&path.into_inner()).await?;
    Ok(web::Json(result_list(list)))
}

#[utoipa::path(
    get,
    path = "/post/{id}",
    tag = "动态",
    summary = "按 ID 查询动态",
    responses((status = 200, description = "成功", body = ApiResponse<PostEntity>))
)]
#[get("/post/{id}")]
async fn post_get(path: web::Path<String>, req: HttpRequest) -> Result<impl Responder, AppError> {
    auth_actor(&req).await?;
    let post = PostService::get().find_by_id(&path.into_inner()).await?.ok_or(AppError::NotFound)?;
    Ok(web::Json(result_data(post)))
}
