use crate::result::{ApiResponse, result, result_data};
use actix_web::{HttpRequest, Responder, post, web};
use biz_service::manager::auth_manager::{AuthManager, AuthManagerOpt};
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_register);
    cfg.service(auth_login);
    cfg.service(auth_logout);
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    #[validate(length(min = 3, max = 32, message = "用户名长度为3~32"))]
    pub name: String,

    #[validate(length(min = 6, max = 64, message = "密码长度为6~64"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[validate(length(min = 3, max = 32, message = "用户名长度为3~32"))]
    pub name: String,

    #[validate(length(min = 6, max = 64, message = "密码长度为6~64"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResp {
    pub token: String,
    pub uid: String,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "认证",
    summary = "注册账号",
    request_body = RegisterDto,
    responses((status = 200, description = "成功", body = ApiResponse<String>))
)]
#[post("/auth/register")]
async fn auth_register(dto: web::Json<RegisterDto>) -> Result<impl Responder, AppError> {
    dto.validate()?;
    let user = AuthManager::get().register(&dto.name, &dto.password).await?;
    Ok(web::Json(result_data(user.id)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "认证",
    summary = "登录并签发令牌",
    request_body = LoginDto,
    responses((status = 200, description = "成功", body = ApiResponse<LoginResp>))
)]
#[post("/auth/login")]
async fn auth_login(dto: web::Json<LoginDto>) -> Result<impl Responder, AppError> {
    dto.validate()?;
    let (token, user) = AuthManager::get().login(&dto.name, &dto.password).await?;
    Ok(web::Json(result_data(LoginResp { token, uid: user.id })))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "认证",
    summary = "注销当前令牌",
    responses((status = 200, description = "成功", body = ApiResponse<String>))
)]
#[post("/auth/logout")]
async fn auth_logout(req: HttpRequest) -> Result<impl Responder, AppError> {
    if let Some(token) = req.headers().get("token").and_then(|v| v.to_str().ok()) {
        AuthManager::get().logout(token).await?;
    }
    Ok(web::Json(result()))
}
