//! 待评照片挑选
//!
//! 评委只会拿到启用中、且自己从未投过票的照片。只要对某张照片投过任一维度，
//! 该照片就不再出现，缺失的维度通过修改投票补齐。

use rand::Rng;
use tracing::{debug, warn};

use crate::config::SelectionOrder;
use crate::errors::{PhotoVoteError, Result};
use crate::models::photos::entities::NextPhoto;
use crate::storage::Storage;

// 候选照片在挑选与读取之间被删除时的重试次数
const MAX_ATTEMPTS: usize = 3;

/// 为评委挑选下一张照片，`image_url` 已按 `public_base_url` 补全
pub async fn select_next(
    storage: &dyn Storage,
    judge_id: i64,
    order: SelectionOrder,
    public_base_url: &str,
) -> Result<NextPhoto> {
    if storage.get_user_by_id(judge_id).await?.is_none() {
        return Err(PhotoVoteError::invalid_judge(format!(
            "Judge {judge_id} does not exist"
        )));
    }

    for _ in 0..MAX_ATTEMPTS {
        let eligible = storage.list_eligible_photo_ids(judge_id).await?;
        let Some(photo_id) = pick(&eligible, order) else {
            debug!("Judge {} has no photos left", judge_id);
            return Ok(NextPhoto::Exhausted);
        };

        if let Some(photo) = storage.get_photo_by_id(photo_id).await? {
            return Ok(NextPhoto::Photo(photo.with_resolved_url(public_base_url)));
        }
    }

    warn!(
        "Judge {} lost {} candidate photos in a row, reporting no more photos",
        judge_id, MAX_ATTEMPTS
    );
    Ok(NextPhoto::Exhausted)
}

/// 从升序排列的候选 ID 中取一个
fn pick(ids: &[i64], order: SelectionOrder) -> Option<i64> {
    if ids.is_empty() {
        return None;
    }
    match order {
        SelectionOrder::Sequential => ids.first().copied(),
        SelectionOrder::Random => Some(ids[rand::rng().random_range(0..ids.len())]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::photos::requests::UpdatePhotoRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::models::votes::entities::Rating;
    use crate::models::metrics::requests::CreateMetricRequest;
    use crate::services::votes::recorder;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use std::collections::HashSet;

    async fn judge(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_user(CreateUserRequest {
                name: "Judge".to_string(),
                key: Some("judge-key".to_string()),
                role: UserRole::Judge,
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_pick() {
        assert_eq!(pick(&[], SelectionOrder::Random), None);
        assert_eq!(pick(&[3, 5, 9], SelectionOrder::Sequential), Some(3));
        for _ in 0..20 {
            let picked = pick(&[3, 5, 9], SelectionOrder::Random).unwrap();
            assert!([3, 5, 9].contains(&picked));
        }
    }

    #[tokio::test]
    async fn test_unknown_judge() {
        let storage = SeaOrmStorage::in_memory().await;
        let err = select_next(&storage, 404, SelectionOrder::Random, "")
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoVoteError::InvalidJudge(_)));
    }

    #[tokio::test]
    async fn test_inactive_photo_is_never_selected() {
        let storage = SeaOrmStorage::in_memory().await;
        let judge_id = judge(&storage).await;
        let photo = storage.create_photo("alice", "/uploads/a.jpg").await.unwrap();
        storage
            .update_photo(
                photo.id,
                UpdatePhotoRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        for _ in 0..5 {
            let next = select_next(&storage, judge_id, SelectionOrder::Random, "")
                .await
                .unwrap();
            assert_eq!(next, NextPhoto::Exhausted);
        }
    }

    #[tokio::test]
    async fn test_relative_url_is_resolved() {
        let storage = SeaOrmStorage::in_memory().await;
        let judge_id = judge(&storage).await;
        storage.create_photo("alice", "/uploads/a.jpg").await.unwrap();

        let next = select_next(
            &storage,
            judge_id,
            SelectionOrder::Sequential,
            "https://photos.example.com",
        )
        .await
        .unwrap();
        match next {
            NextPhoto::Photo(photo) => {
                assert_eq!(photo.image_url, "https://photos.example.com/uploads/a.jpg")
            }
            NextPhoto::Exhausted => panic!("expected a photo"),
        }
    }

    #[tokio::test]
    async fn test_three_rounds_then_exhausted() {
        let storage = SeaOrmStorage::in_memory().await;
        let judge_id = judge(&storage).await;
        let metric = storage
            .create_metric(CreateMetricRequest {
                name: "Overall".to_string(),
                scale: 10,
            })
            .await
            .unwrap();
        for i in 0..3 {
            storage
                .create_photo(&format!("user{i}"), &format!("/uploads/{i}.jpg"))
                .await
                .unwrap();
        }

        let mut seen = HashSet::new();
        for _ in 0..3 {
            let photo = match select_next(&storage, judge_id, SelectionOrder::Random, "")
                .await
                .unwrap()
            {
                NextPhoto::Photo(photo) => photo,
                NextPhoto::Exhausted => panic!("ran out of photos too early"),
            };
            assert!(seen.insert(photo.id), "photo {} served twice", photo.id);

            recorder::submit(
                &storage,
                judge_id,
                photo.id,
                &[Rating {
                    metric_id: metric.id,
                    value: 5.0,
                }],
            )
            .await
            .unwrap();
        }

        let fourth = select_next(&storage, judge_id, SelectionOrder::Random, "")
            .await
            .unwrap();
        assert_eq!(fourth, NextPhoto::Exhausted);
    }
}
