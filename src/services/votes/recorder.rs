//! 投票记录
//!
//! 提交与修改共用同一套校验，写入都在单个事务中完成。

use std::collections::HashSet;

use crate::errors::{PhotoVoteError, Result};
use crate::models::votes::entities::{Rating, Vote};
use crate::storage::Storage;

/// 首次提交评分，评委已对该照片的任一所提交维度投过票时返回 `DuplicateVote`
pub async fn submit(
    storage: &dyn Storage,
    judge_id: i64,
    photo_id: i64,
    ratings: &[Rating],
) -> Result<Vec<Vote>> {
    validate_ratings(storage, judge_id, photo_id, ratings).await?;
    storage.insert_votes(judge_id, photo_id, ratings).await
}

/// 修改评分，未投过的维度直接插入
pub async fn update(
    storage: &dyn Storage,
    judge_id: i64,
    photo_id: i64,
    ratings: &[Rating],
) -> Result<Vec<Vote>> {
    validate_ratings(storage, judge_id, photo_id, ratings).await?;
    storage.upsert_votes(judge_id, photo_id, ratings).await
}

async fn validate_ratings(
    storage: &dyn Storage,
    judge_id: i64,
    photo_id: i64,
    ratings: &[Rating],
) -> Result<()> {
    if ratings.is_empty() {
        return Err(PhotoVoteError::validation("Ratings must not be empty"));
    }

    let mut seen = HashSet::with_capacity(ratings.len());
    for rating in ratings {
        if !seen.insert(rating.metric_id) {
            return Err(PhotoVoteError::validation(format!(
                "Metric {} is rated more than once",
                rating.metric_id
            )));
        }
    }

    if storage.get_user_by_id(judge_id).await?.is_none() {
        return Err(PhotoVoteError::not_found(format!(
            "Judge {judge_id} does not exist"
        )));
    }
    if storage.get_photo_by_id(photo_id).await?.is_none() {
        return Err(PhotoVoteError::not_found(format!(
            "Photo {photo_id} does not exist"
        )));
    }

    for rating in ratings {
        let Some(metric) = storage.get_metric_by_id(rating.metric_id).await? else {
            return Err(PhotoVoteError::unknown_metric(format!(
                "Metric {} does not exist",
                rating.metric_id
            )));
        };
        if !metric.accepts(rating.value) {
            return Err(PhotoVoteError::validation(format!(
                "Value {} is outside [0, {}] for metric {}",
                rating.value, metric.scale, metric.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::entities::Metric;
    use crate::models::metrics::requests::CreateMetricRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::models::votes::requests::VoteListQuery;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    struct Fixture {
        storage: SeaOrmStorage,
        judge_id: i64,
        photo_id: i64,
        metric: Metric,
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::in_memory().await;
        let judge_id = storage
            .create_user(CreateUserRequest {
                name: "Judge".to_string(),
                key: Some("judge-key".to_string()),
                role: UserRole::Judge,
            })
            .await
            .unwrap()
            .id;
        let photo_id = storage
            .create_photo("alice", "/uploads/a.jpg")
            .await
            .unwrap()
            .id;
        let metric = storage
            .create_metric(CreateMetricRequest {
                name: "Composition".to_string(),
                scale: 10,
            })
            .await
            .unwrap();
        Fixture {
            storage,
            judge_id,
            photo_id,
            metric,
        }
    }

    fn rating(metric_id: i64, value: f64) -> Rating {
        Rating { metric_id, value }
    }

    #[tokio::test]
    async fn test_submit_then_duplicate() {
        let f = fixture().await;
        let votes = submit(&f.storage, f.judge_id, f.photo_id, &[rating(f.metric.id, 7.0)])
            .await
            .unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, 7.0);

        let err = submit(&f.storage, f.judge_id, f.photo_id, &[rating(f.metric.id, 3.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::DuplicateVote(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_value_in_place() {
        let f = fixture().await;
        submit(&f.storage, f.judge_id, f.photo_id, &[rating(f.metric.id, 4.0)])
            .await
            .unwrap();
        update(&f.storage, f.judge_id, f.photo_id, &[rating(f.metric.id, 8.0)])
            .await
            .unwrap();

        let votes = f
            .storage
            .list_votes(VoteListQuery {
                photo_id: Some(f.photo_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, 8.0);
    }

    #[tokio::test]
    async fn test_update_inserts_missing_metric() {
        let f = fixture().await;
        let lighting = f
            .storage
            .create_metric(CreateMetricRequest {
                name: "Lighting".to_string(),
                scale: 5,
            })
            .await
            .unwrap();
        submit(&f.storage, f.judge_id, f.photo_id, &[rating(f.metric.id, 6.0)])
            .await
            .unwrap();

        let votes = update(
            &f.storage,
            f.judge_id,
            f.photo_id,
            &[rating(f.metric.id, 6.0), rating(lighting.id, 2.5)],
        )
        .await
        .unwrap();
        assert_eq!(votes.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let f = fixture().await;
        let cases: [&[Rating]; 4] = [
            &[],
            &[rating(f.metric.id, 11.0)],
            &[rating(f.metric.id, -1.0)],
            &[rating(f.metric.id, 1.0), rating(f.metric.id, 2.0)],
        ];
        for ratings in cases {
            let err = submit(&f.storage, f.judge_id, f.photo_id, ratings)
                .await
                .unwrap_err();
            assert!(matches!(err, PhotoVoteError::Validation(_)), "{err}");
        }

        let nan = submit(
            &f.storage,
            f.judge_id,
            f.photo_id,
            &[rating(f.metric.id, f64::NAN)],
        )
        .await
        .unwrap_err();
        assert!(matches!(nan, PhotoVoteError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_references() {
        let f = fixture().await;

        let err = submit(&f.storage, f.judge_id, f.photo_id, &[rating(9999, 1.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::UnknownMetric(_)));

        let err = submit(&f.storage, f.judge_id, 9999, &[rating(f.metric.id, 1.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::NotFound(_)));

        let err = update(&f.storage, 9999, f.photo_id, &[rating(f.metric.id, 1.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::NotFound(_)));

        // 校验失败时不写入任何投票
        let votes = f.storage.list_votes(VoteListQuery::default()).await.unwrap();
        assert!(votes.is_empty());
    }
}
