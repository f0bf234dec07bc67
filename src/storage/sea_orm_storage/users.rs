use super::{SeaOrmStorage, map_write_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::votes::{Column as VoteColumn, Entity as Votes};
use crate::errors::{PhotoVoteError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let key = req
            .key
            .ok_or_else(|| PhotoVoteError::validation("创建用户时必须提供登录 key"))?;
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            key: Set(key),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建用户"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过登录 key 获取用户
    pub async fn get_user_by_key_impl(&self, key: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 10);

        let mut select = Users::find();

        // 按名称搜索
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.contains(search.trim()));
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(key) = update.key {
            model.key = Set(key);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新用户"))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户及其投票
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("开启事务失败: {e}")))?;

        Votes::delete_many()
            .filter(VoteColumn::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("删除用户投票失败: {e}")))?;

        let result = Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("删除用户失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn judge(name: &str, key: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            key: Some(key.to_string()),
            role: UserRole::Judge,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_key() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user_impl(judge("Alice", "alice-key"))
            .await
            .unwrap();

        let found = storage.get_user_by_key_impl("alice-key").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(storage.get_user_by_key_impl("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_key_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_user_impl(judge("Alice", "shared-key"))
            .await
            .unwrap();

        let err = storage
            .create_user_impl(judge("Bob", "shared-key"))
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_role_and_search() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_user_impl(judge("Alice", "alice-key"))
            .await
            .unwrap();
        storage
            .create_user_impl(judge("Bob", "bob-key-1"))
            .await
            .unwrap();
        storage
            .create_user_impl(CreateUserRequest {
                name: "Root".to_string(),
                key: Some("root-key".to_string()),
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        let judges = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Judge),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(judges.pagination.total, 2);

        let bobs = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("Bo".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(bobs.items.len(), 1);
        assert_eq!(bobs.items[0].name, "Bob");
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user_impl(judge("Alice", "alice-key"))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    name: Some("Alicia".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.key, "alice-key");

        assert!(
            storage
                .update_user_impl(9999, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );

        assert!(storage.delete_user_impl(user.id).await.unwrap());
        assert!(!storage.delete_user_impl(user.id).await.unwrap());
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);
    }
}
