use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::validate_key;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ADMIN_KEY_LEN: usize = 16;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 解析管理员 key：优先使用 ADMIN_KEY，不合法或未设置时生成
fn resolve_admin_key(env_key: Option<String>) -> (String, bool) {
    match env_key {
        Some(key) if validate_key(&key).is_ok() => (key, false),
        Some(_) => {
            warn!("ADMIN_KEY is invalid, falling back to a generated key");
            (generate_random_code(ADMIN_KEY_LEN), true)
        }
        None => (generate_random_code(ADMIN_KEY_LEN), true),
    }
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个默认的 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let (key, generated) = resolve_admin_key(std::env::var("ADMIN_KEY").ok());
    if generated {
        warn!("==========================================================");
        warn!("  ADMIN KEY NOT SET - USING GENERATED KEY");
        warn!("  Generated admin key: {}", key);
        warn!("  Please save this key or set ADMIN_KEY env var");
        warn!("==========================================================");
    }

    let admin_request = CreateUserRequest {
        name: "Administrator".to_string(),
        key: Some(key),
        role: UserRole::Admin,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, name: {})",
                user.id, user.name
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储与会话缓存
pub async fn prepare_server_startup() -> StartupContext {
    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::from_config());
    warn!("Session cache initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[test]
    fn test_resolve_admin_key() {
        assert_eq!(
            resolve_admin_key(Some("admin-key-1".to_string())),
            ("admin-key-1".to_string(), false)
        );

        let (key, generated) = resolve_admin_key(Some("bad key".to_string()));
        assert!(generated);
        assert_eq!(key.len(), ADMIN_KEY_LEN);

        let (_, generated) = resolve_admin_key(None);
        assert!(generated);
    }

    #[tokio::test]
    async fn test_seed_admin_only_once() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        seed_admin(&storage).await;
        seed_admin(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}
