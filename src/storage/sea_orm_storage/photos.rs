use super::{SeaOrmStorage, map_write_error};
use crate::entity::photos::{ActiveModel, Column, Entity as Photos};
use crate::entity::votes::{Column as VoteColumn, Entity as Votes};
use crate::errors::{PhotoVoteError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    photos::{
        entities::Photo,
        requests::{PhotoListQuery, UpdatePhotoRequest},
        responses::PhotoListResponse,
    },
};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 登记照片
    pub async fn create_photo_impl(&self, username: &str, image_url: &str) -> Result<Photo> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(username.to_string()),
            image_url: Set(image_url.to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "登记照片"))?;

        Ok(result.into_photo())
    }

    /// 通过 ID 获取照片
    pub async fn get_photo_by_id_impl(&self, id: i64) -> Result<Option<Photo>> {
        let result = Photos::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询照片失败: {e}")))?;

        Ok(result.map(|m| m.into_photo()))
    }

    /// 分页列出照片
    pub async fn list_photos_with_pagination_impl(
        &self,
        query: PhotoListQuery,
    ) -> Result<PhotoListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Photos::find();

        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        if let Some(ref username) = query.username
            && !username.trim().is_empty()
        {
            select = select.filter(Column::Username.contains(username.trim()));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询照片总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询照片页数失败: {e}")))?;

        let photos = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询照片列表失败: {e}")))?;

        Ok(PhotoListResponse {
            items: photos.into_iter().map(|m| m.into_photo()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 列出全部照片，按 ID 升序
    pub async fn list_all_photos_impl(&self, active: Option<bool>) -> Result<Vec<Photo>> {
        let mut select = Photos::find();
        if let Some(active) = active {
            select = select.filter(Column::Active.eq(active));
        }

        let photos = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询照片列表失败: {e}")))?;

        Ok(photos.into_iter().map(|m| m.into_photo()).collect())
    }

    /// 更新照片
    pub async fn update_photo_impl(
        &self,
        id: i64,
        update: UpdatePhotoRequest,
    ) -> Result<Option<Photo>> {
        let existing = self.get_photo_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(username) = update.username {
            model.username = Set(username);
        }

        if let Some(image_url) = update.image_url {
            model.image_url = Set(image_url);
        }

        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新照片"))?;

        self.get_photo_by_id_impl(id).await
    }

    /// 删除照片及其投票
    pub async fn delete_photo_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("开启事务失败: {e}")))?;

        Votes::delete_many()
            .filter(VoteColumn::PhotoId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("删除照片投票失败: {e}")))?;

        let result = Photos::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("删除照片失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 评委尚未投过任何票的启用照片 ID
    ///
    /// 只要评委对某张照片投过任一维度，该照片即视为已评。
    pub async fn list_eligible_photo_ids_impl(&self, judge_id: i64) -> Result<Vec<i64>> {
        let voted = Query::select()
            .column(VoteColumn::PhotoId)
            .from(Votes)
            .and_where(VoteColumn::UserId.eq(judge_id))
            .to_owned();

        let ids: Vec<i64> = Photos::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Active.eq(true))
            .filter(Column::Id.not_in_subquery(voted))
            .order_by_asc(Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询待评照片失败: {e}")))?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list_photos() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_photo_impl("alice", "/uploads/a.jpg")
            .await
            .unwrap();
        let hidden = storage
            .create_photo_impl("bob", "https://cdn.example.com/b.png")
            .await
            .unwrap();
        storage
            .update_photo_impl(
                hidden.id,
                UpdatePhotoRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let all = storage.list_all_photos_impl(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);

        let active = storage.list_all_photos_impl(Some(true)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].username, "alice");

        let page = storage
            .list_photos_with_pagination_impl(PhotoListQuery {
                username: Some("bo".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert!(!page.items[0].active);
    }

    #[tokio::test]
    async fn test_eligible_excludes_inactive_photos() {
        let storage = SeaOrmStorage::in_memory().await;
        let first = storage.create_photo_impl("a", "/uploads/1.jpg").await.unwrap();
        let second = storage.create_photo_impl("b", "/uploads/2.jpg").await.unwrap();
        storage
            .update_photo_impl(
                second.id,
                UpdatePhotoRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let ids = storage.list_eligible_photo_ids_impl(1).await.unwrap();
        assert_eq!(ids, vec![first.id]);
    }

    #[tokio::test]
    async fn test_delete_missing_photo() {
        let storage = SeaOrmStorage::in_memory().await;
        assert!(!storage.delete_photo_impl(42).await.unwrap());
        assert!(
            storage
                .update_photo_impl(42, UpdatePhotoRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
