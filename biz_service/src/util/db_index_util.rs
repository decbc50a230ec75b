use futures::StreamExt;
use mongodb::bson::Document;
use mongodb::{Collection, IndexModel};

/// 启动时为集合补齐缺失的索引（按索引名判断，已存在则跳过）
pub async fn index_create(coll: Collection<Document>, target_list: Vec<IndexModel>) {
    let mut create_index_list = vec![];
    for target in target_list {
        let options = target.options.clone().unwrap_or_default();
        let name = options.name.unwrap_or_default();
        let mut has_index = false;
        let mut cursor = match coll.list_indexes().await {
            Ok(cursor) => cursor,
            Err(e) => {
                log::error!("❌ 列出索引失败: {:?}", e);
                continue;
            }
        };
        while let Some(index) = cursor.next().await {
            match index {
                Ok(index_info) => {
                    let index_name = index_info.options.unwrap_or_default().name.unwrap_or_default();
                    if name == index_name {
                        has_index = true;
                        break;
                    }
                }
                Err(e) => log::error!("❌ 列出索引失败: {:?}", e),
            }
        }
        if !has_index {
            create_index_list.push(target);
        }
    }

    for target in create_index_list {
        match coll.create_index(target.clone()).await {
            Ok(_) => log::info!("✅ 创建索引成功: {}", target.keys.to_string()),
            Err(e) => log::error!("❌ 创建索引失败: {:?}", e),
        }
    }
}
