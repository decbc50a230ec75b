mod handlers;
mod result;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use biz_service::biz_service::post_service::PostService;
use biz_service::biz_service::relation_service::RelationService;
use biz_service::biz_service::user_service::UserService;
use biz_service::manager::auth_manager::AuthManager;
use biz_service::util::db_index_util::index_create;
use common::config::AppConfig;
use common::errors::AppError;
use common::repository::db::Db;
use log::{LevelFilter, warn};
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use std::str::FromStr;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 读取配置文件
    AppConfig::init(&"api-config.toml".to_string());
    let app_cfg = AppConfig::get();
    //初始化日志
    init_log(&app_cfg.get_sys().log_level).expect("Failed to init logger");

    //初始化数据库与各服务单例
    Db::init(&app_cfg.get_database()).await.expect("Failed to init MongoDB");
    let db = Db::get().clone();
    init_indexes(&db).await;
    UserService::init(db.clone());
    RelationService::init(db.clone());
    PostService::init(db.clone());
    AuthManager::init(app_cfg.get_sys().token_ttl_secs);

    let address_and_port = format!("{}:{}", &app_cfg.get_server().host, &app_cfg.get_server().port);
    warn!("Starting server on {}", address_and_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // 配置 控制器
            .configure(|cfg| {
                handlers::configure(cfg);
            })
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(std::time::Duration::from_secs(600))) // 允许 10 分钟超时
    .bind(address_and_port)?
    .run()
    .await
}

pub fn init_log(log_level: &str) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::new();
    let filter = builder.filter(None, LevelFilter::from_str(log_level).unwrap_or(LevelFilter::Info));
    filter.init();
    Ok(())
}

/// 启动时补齐集合索引：用户名唯一、墙主查询
async fn init_indexes(db: &Database) {
    let user_indexes = vec![
        IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().name("uk_user_name".to_string()).unique(true).build())
            .build(),
        IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().name("uk_user_id".to_string()).unique(true).build())
            .build(),
    ];
    index_create(db.collection("user_info"), user_indexes).await;

    let post_indexes = vec![
        IndexModel::builder()
            .keys(doc! { "receiver": 1 })
            .options(IndexOptions::builder().name("idx_post_receiver".to_string()).build())
            .build(),
    ];
    index_create(db.collection("post_info"), post_indexes).await;
}
