use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_error};
use crate::entity::photos::{Column as PhotoColumn, Entity as Photos};
use crate::entity::votes::{ActiveModel, Column, Entity as Votes};
use crate::errors::{PhotoVoteError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    votes::{
        entities::{Rating, Vote, vote_key},
        requests::{JudgedPhotoQuery, VoteListQuery},
        responses::JudgedPhotoListResponse,
    },
};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 投票写入时唯一约束冲突即为重复投票
fn map_vote_write_error(err: sea_orm::DbErr) -> PhotoVoteError {
    match map_write_error(err, "写入投票") {
        PhotoVoteError::Conflict(msg) => PhotoVoteError::duplicate_vote(msg),
        other => other,
    }
}

async fn insert_vote(
    txn: &DatabaseTransaction,
    judge_id: i64,
    photo_id: i64,
    rating: &Rating,
    now: i64,
) -> Result<Vote> {
    let model = ActiveModel {
        value: Set(rating.value),
        user_id: Set(judge_id),
        photo_id: Set(photo_id),
        metric_id: Set(rating.metric_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let inserted = model.insert(txn).await.map_err(map_vote_write_error)?;
    Ok(inserted.into_vote())
}

impl SeaOrmStorage {
    /// 在一个事务内写入新投票
    pub async fn insert_votes_impl(
        &self,
        judge_id: i64,
        photo_id: i64,
        ratings: &[Rating],
    ) -> Result<Vec<Vote>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("开启事务失败: {e}")))?;

        let metric_ids: Vec<i64> = ratings.iter().map(|r| r.metric_id).collect();
        let existing = Votes::find()
            .filter(Column::UserId.eq(judge_id))
            .filter(Column::PhotoId.eq(photo_id))
            .filter(Column::MetricId.is_in(metric_ids))
            .count(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询已有投票失败: {e}")))?;

        if existing > 0 {
            return Err(PhotoVoteError::duplicate_vote(format!(
                "评委 {judge_id} 已对照片 {photo_id} 投过票"
            )));
        }

        let mut votes = Vec::with_capacity(ratings.len());
        for rating in ratings {
            votes.push(insert_vote(&txn, judge_id, photo_id, rating, now).await?);
        }

        txn.commit()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(votes)
    }

    /// 在一个事务内修改投票，缺失的行直接插入
    pub async fn upsert_votes_impl(
        &self,
        judge_id: i64,
        photo_id: i64,
        ratings: &[Rating],
    ) -> Result<Vec<Vote>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("开启事务失败: {e}")))?;

        let mut votes = Vec::with_capacity(ratings.len());
        for rating in ratings {
            let existing = Votes::find()
                .filter(Column::UserId.eq(judge_id))
                .filter(Column::PhotoId.eq(photo_id))
                .filter(Column::MetricId.eq(rating.metric_id))
                .one(&txn)
                .await
                .map_err(|e| {
                    PhotoVoteError::database_operation(format!("查询已有投票失败: {e}"))
                })?;

            let vote = match existing {
                Some(model) => {
                    let mut active: ActiveModel = model.into();
                    active.value = Set(rating.value);
                    active.updated_at = Set(now);
                    active
                        .update(&txn)
                        .await
                        .map_err(map_vote_write_error)?
                        .into_vote()
                }
                None => insert_vote(&txn, judge_id, photo_id, rating, now).await?,
            };
            votes.push(vote);
        }

        txn.commit()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(votes)
    }

    /// 按条件列出投票
    pub async fn list_votes_impl(&self, query: VoteListQuery) -> Result<Vec<Vote>> {
        let mut select = Votes::find();

        if let Some(photo_id) = query.photo_id {
            select = select.filter(Column::PhotoId.eq(photo_id));
        }
        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(metric_id) = query.metric_id {
            select = select.filter(Column::MetricId.eq(metric_id));
        }

        let votes = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询投票失败: {e}")))?;

        Ok(votes.into_iter().map(|m| m.into_vote()).collect())
    }

    /// 评委已评照片，按照片 ID 降序分页
    pub async fn list_judged_photos_impl(
        &self,
        judge_id: i64,
        query: JudgedPhotoQuery,
    ) -> Result<JudgedPhotoListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 5);

        let voted = Query::select()
            .column(Column::PhotoId)
            .from(Votes)
            .and_where(Column::UserId.eq(judge_id))
            .to_owned();

        let paginator = Photos::find()
            .filter(PhotoColumn::Id.in_subquery(voted))
            .order_by_desc(PhotoColumn::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询已评照片总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询已评照片页数失败: {e}")))?;
        let photos = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询已评照片失败: {e}")))?;

        let photo_ids: Vec<i64> = photos.iter().map(|p| p.id).collect();
        let votes = Votes::find()
            .filter(Column::UserId.eq(judge_id))
            .filter(Column::PhotoId.is_in(photo_ids))
            .all(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询评委投票失败: {e}")))?;

        let votes: HashMap<String, f64> = votes
            .into_iter()
            .map(|v| (vote_key(v.photo_id, v.metric_id), v.value))
            .collect();

        Ok(JudgedPhotoListResponse {
            items: photos.into_iter().map(|m| m.into_photo()).collect(),
            votes,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::requests::CreateMetricRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    struct Fixture {
        storage: SeaOrmStorage,
        judge_id: i64,
        photo_ids: Vec<i64>,
        metric_ids: Vec<i64>,
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::in_memory().await;
        let judge = storage
            .create_user_impl(CreateUserRequest {
                name: "Judge".to_string(),
                key: Some("judge-key".to_string()),
                role: UserRole::Judge,
            })
            .await
            .unwrap();

        let mut photo_ids = Vec::new();
        for i in 0..3 {
            let photo = storage
                .create_photo_impl(&format!("user{i}"), &format!("/uploads/{i}.jpg"))
                .await
                .unwrap();
            photo_ids.push(photo.id);
        }

        let mut metric_ids = Vec::new();
        for name in ["Light", "Focus"] {
            let metric = storage
                .create_metric_impl(CreateMetricRequest {
                    name: name.to_string(),
                    scale: 10,
                })
                .await
                .unwrap();
            metric_ids.push(metric.id);
        }

        Fixture {
            storage,
            judge_id: judge.id,
            photo_ids,
            metric_ids,
        }
    }

    fn ratings(metric_ids: &[i64], value: f64) -> Vec<Rating> {
        metric_ids
            .iter()
            .map(|&metric_id| Rating { metric_id, value })
            .collect()
    }

    #[tokio::test]
    async fn test_insert_then_duplicate_is_rejected() {
        let f = fixture().await;
        let photo = f.photo_ids[0];

        let votes = f
            .storage
            .insert_votes_impl(f.judge_id, photo, &ratings(&f.metric_ids, 7.0))
            .await
            .unwrap();
        assert_eq!(votes.len(), 2);

        let err = f
            .storage
            .insert_votes_impl(f.judge_id, photo, &ratings(&f.metric_ids[..1], 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::DuplicateVote(_)));

        let stored = f
            .storage
            .list_votes_impl(VoteListQuery {
                photo_id: Some(photo),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|v| v.value == 7.0));
    }

    #[tokio::test]
    async fn test_failed_batch_writes_nothing() {
        let f = fixture().await;
        let mut batch = ratings(&f.metric_ids[..1], 5.0);
        batch.push(Rating {
            metric_id: 9999,
            value: 5.0,
        });

        let result = f
            .storage
            .insert_votes_impl(f.judge_id, f.photo_ids[0], &batch)
            .await;
        assert!(result.is_err());

        let stored = f
            .storage
            .list_votes_impl(VoteListQuery::default())
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_value_in_place() {
        let f = fixture().await;
        let photo = f.photo_ids[1];
        let metric = f.metric_ids[0];

        f.storage
            .insert_votes_impl(f.judge_id, photo, &ratings(&[metric], 4.0))
            .await
            .unwrap();
        f.storage
            .upsert_votes_impl(f.judge_id, photo, &ratings(&[metric], 8.0))
            .await
            .unwrap();

        let stored = f
            .storage
            .list_votes_impl(VoteListQuery {
                photo_id: Some(photo),
                metric_id: Some(metric),
                user_id: Some(f.judge_id),
            })
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, 8.0);
    }

    #[tokio::test]
    async fn test_voted_photos_leave_eligible_set() {
        let f = fixture().await;
        f.storage
            .insert_votes_impl(f.judge_id, f.photo_ids[0], &ratings(&f.metric_ids[..1], 6.0))
            .await
            .unwrap();

        let eligible = f
            .storage
            .list_eligible_photo_ids_impl(f.judge_id)
            .await
            .unwrap();
        assert_eq!(eligible, vec![f.photo_ids[1], f.photo_ids[2]]);
    }

    #[tokio::test]
    async fn test_delete_metric_removes_its_votes() {
        let f = fixture().await;
        f.storage
            .insert_votes_impl(f.judge_id, f.photo_ids[0], &ratings(&f.metric_ids, 6.0))
            .await
            .unwrap();

        assert!(f.storage.delete_metric_impl(f.metric_ids[0]).await.unwrap());

        let stored = f
            .storage
            .list_votes_impl(VoteListQuery::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].metric_id, f.metric_ids[1]);
    }

    #[tokio::test]
    async fn test_judged_photos_are_newest_first_with_vote_map() {
        let f = fixture().await;
        for &photo in &f.photo_ids {
            f.storage
                .insert_votes_impl(f.judge_id, photo, &ratings(&f.metric_ids, 5.0))
                .await
                .unwrap();
        }

        let page = f
            .storage
            .list_judged_photos_impl(
                f.judge_id,
                JudgedPhotoQuery {
                    page: Some(1),
                    size: Some(2),
                },
            )
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items[0].id, f.photo_ids[2]);
        assert_eq!(page.items[1].id, f.photo_ids[1]);
        assert_eq!(page.votes.len(), 4);
        assert_eq!(
            page.votes.get(&vote_key(f.photo_ids[2], f.metric_ids[0])),
            Some(&5.0)
        );
    }
}
