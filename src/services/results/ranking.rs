//! 成绩汇总
//!
//! 每次请求都从照片、维度和投票重新计算，不做缓存。

use std::collections::HashMap;

use crate::errors::Result;
use crate::models::metrics::entities::Metric;
use crate::models::photos::entities::Photo;
use crate::models::results::entities::{MetricAverage, PhotoScore};
use crate::models::results::requests::RankingQuery;
use crate::models::results::responses::RankingResponse;
use crate::models::votes::entities::Vote;
use crate::models::votes::requests::VoteListQuery;
use crate::storage::Storage;

#[derive(Default, Clone, Copy)]
struct Tally {
    sum: f64,
    count: i64,
}

/// 计算每张照片在各维度的平均分与总分，按总分降序排列
///
/// `photos` 应按 ID 升序传入，总分相同时保持输入顺序。
/// 维度或照片不在输入中的投票会被忽略。
pub fn rank(photos: &[Photo], metrics: &[Metric], votes: &[Vote]) -> Vec<PhotoScore> {
    let photo_index: HashMap<i64, usize> = photos
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();
    let metric_index: HashMap<i64, usize> = metrics
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, i))
        .collect();

    let mut tallies = vec![vec![Tally::default(); metrics.len()]; photos.len()];
    for vote in votes {
        let (Some(&p), Some(&m)) = (
            photo_index.get(&vote.photo_id),
            metric_index.get(&vote.metric_id),
        ) else {
            continue;
        };
        tallies[p][m].sum += vote.value;
        tallies[p][m].count += 1;
    }

    let mut scores: Vec<PhotoScore> = photos
        .iter()
        .zip(tallies)
        .map(|(photo, row)| {
            let metric_averages: Vec<MetricAverage> = metrics
                .iter()
                .zip(row)
                .map(|(metric, tally)| MetricAverage {
                    metric_id: metric.id,
                    metric_name: metric.name.clone(),
                    scale: metric.scale,
                    average: if tally.count == 0 {
                        0.0
                    } else {
                        tally.sum / tally.count as f64
                    },
                    vote_count: tally.count,
                })
                .collect();

            let overall_score = if metric_averages.is_empty() {
                0.0
            } else {
                metric_averages.iter().map(|m| m.average).sum::<f64>()
                    / metric_averages.len() as f64
            };

            PhotoScore {
                photo: photo.clone(),
                metric_averages,
                overall_score,
            }
        })
        .collect();

    // sort_by 是稳定排序
    scores.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
    scores
}

/// 读取照片、维度与投票后计算排名
pub async fn load_and_rank(storage: &dyn Storage, query: &RankingQuery) -> Result<RankingResponse> {
    let photos = storage.list_all_photos(query.active).await?;
    let metrics = storage.list_metrics().await?;
    let votes = storage
        .list_votes(VoteListQuery {
            user_id: query.judge_id,
            ..Default::default()
        })
        .await?;

    let items = rank(&photos, &metrics, &votes);
    let total_votes = items
        .iter()
        .flat_map(|score| score.metric_averages.iter())
        .map(|m| m.vote_count)
        .sum();

    Ok(RankingResponse {
        metrics,
        items,
        total_votes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::requests::CreateMetricRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::models::votes::entities::Rating;
    use crate::services::votes::recorder;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    fn photo(id: i64) -> Photo {
        Photo {
            id,
            username: format!("user{id}"),
            image_url: format!("/uploads/{id}.jpg"),
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn metric(id: i64, scale: i32) -> Metric {
        Metric {
            id,
            name: format!("metric{id}"),
            scale,
        }
    }

    fn vote(id: i64, user_id: i64, photo_id: i64, metric_id: i64, value: f64) -> Vote {
        Vote {
            id,
            value,
            user_id,
            photo_id,
            metric_id,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_metric_and_overall_averages() {
        let photos = [photo(1)];
        let metrics = [metric(1, 10), metric(2, 5)];
        let votes = [
            vote(1, 1, 1, 1, 8.0),
            vote(2, 2, 1, 1, 6.0),
            vote(3, 1, 1, 2, 5.0),
        ];

        let scores = rank(&photos, &metrics, &votes);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].average_for(1), Some(7.0));
        assert_eq!(scores[0].average_for(2), Some(5.0));
        assert_eq!(scores[0].overall_score, 6.0);
        assert_eq!(scores[0].metric_averages[0].vote_count, 2);
    }

    #[test]
    fn test_zero_votes_average_zero() {
        let scores = rank(&[photo(1)], &[metric(1, 10)], &[]);
        assert_eq!(scores[0].average_for(1), Some(0.0));
        assert_eq!(scores[0].overall_score, 0.0);
        assert_eq!(scores[0].metric_averages[0].vote_count, 0);
    }

    #[test]
    fn test_no_metrics() {
        let scores = rank(&[photo(1), photo(2)], &[], &[vote(1, 1, 1, 1, 3.0)]);
        assert!(scores.iter().all(|s| s.overall_score == 0.0));
        assert!(scores[0].metric_averages.is_empty());
    }

    #[test]
    fn test_orphan_votes_ignored() {
        let votes = [
            vote(1, 1, 1, 1, 4.0),
            vote(2, 1, 1, 99, 10.0),
            vote(3, 1, 42, 1, 10.0),
        ];
        let scores = rank(&[photo(1)], &[metric(1, 10)], &votes);
        assert_eq!(scores[0].overall_score, 4.0);
        assert_eq!(scores[0].metric_averages[0].vote_count, 1);
    }

    #[test]
    fn test_sorted_descending_ties_keep_lower_id_first() {
        let photos = [photo(1), photo(2), photo(3)];
        let votes = [
            vote(1, 1, 1, 1, 5.0),
            vote(2, 1, 2, 1, 9.0),
            vote(3, 1, 3, 1, 5.0),
        ];
        let ids: Vec<i64> = rank(&photos, &[metric(1, 10)], &votes)
            .iter()
            .map(|s| s.photo.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_load_and_rank_after_update_and_metric_delete() {
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
        let photo = storage.create_photo("alice", "/uploads/a.jpg").await.unwrap();
        let keep = storage
            .create_metric(CreateMetricRequest {
                name: "Composition".to_string(),
                scale: 10,
            })
            .await
            .unwrap();
        let dropped = storage
            .create_metric(CreateMetricRequest {
                name: "Color".to_string(),
                scale: 10,
            })
            .await
            .unwrap();

        recorder::submit(
            &storage,
            judge_id,
            photo.id,
            &[
                Rating {
                    metric_id: keep.id,
                    value: 4.0,
                },
                Rating {
                    metric_id: dropped.id,
                    value: 2.0,
                },
            ],
        )
        .await
        .unwrap();
        recorder::update(
            &storage,
            judge_id,
            photo.id,
            &[Rating {
                metric_id: keep.id,
                value: 8.0,
            }],
        )
        .await
        .unwrap();
        assert!(storage.delete_metric(dropped.id).await.unwrap());

        let response = load_and_rank(&storage, &RankingQuery::default())
            .await
            .unwrap();
        assert_eq!(response.metrics.len(), 1);
        assert_eq!(response.total_votes, 1);
        assert_eq!(response.items[0].average_for(keep.id), Some(8.0));
        assert_eq!(response.items[0].overall_score, 8.0);

        // 只统计其他评委的投票时没有任何票
        let filtered = load_and_rank(
            &storage,
            &RankingQuery {
                judge_id: Some(judge_id + 1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(filtered.total_votes, 0);
        assert_eq!(filtered.items[0].overall_score, 0.0);
    }
}
