use super::{SeaOrmStorage, map_write_error};
use crate::entity::metrics::{ActiveModel, Column, Entity as Metrics};
use crate::entity::votes::{Column as VoteColumn, Entity as Votes};
use crate::errors::{PhotoVoteError, Result};
use crate::models::metrics::{
    entities::Metric,
    requests::{CreateMetricRequest, UpdateMetricRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建评分维度
    pub async fn create_metric_impl(&self, req: CreateMetricRequest) -> Result<Metric> {
        let model = ActiveModel {
            name: Set(req.name),
            scale: Set(req.scale),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建评分维度"))?;

        Ok(result.into_metric())
    }

    pub async fn get_metric_by_id_impl(&self, id: i64) -> Result<Option<Metric>> {
        let result = Metrics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询评分维度失败: {e}")))?;

        Ok(result.map(|m| m.into_metric()))
    }

    /// 列出全部评分维度，按 ID 升序
    pub async fn list_metrics_impl(&self) -> Result<Vec<Metric>> {
        let metrics = Metrics::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("查询评分维度失败: {e}")))?;

        Ok(metrics.into_iter().map(|m| m.into_metric()).collect())
    }

    pub async fn update_metric_impl(
        &self,
        id: i64,
        update: UpdateMetricRequest,
    ) -> Result<Option<Metric>> {
        let existing = self.get_metric_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(scale) = update.scale {
            model.scale = Set(scale);
        }

        // 没有任何字段变化时 update 会报错，直接返回原值
        if !model.is_changed() {
            return Ok(existing);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新评分维度"))?;

        self.get_metric_by_id_impl(id).await
    }

    /// 删除评分维度及其全部投票
    pub async fn delete_metric_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("开启事务失败: {e}")))?;

        Votes::delete_many()
            .filter(VoteColumn::MetricId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("删除维度投票失败: {e}")))?;

        let result = Metrics::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("删除评分维度失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PhotoVoteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metric_crud() {
        let storage = SeaOrmStorage::in_memory().await;
        let light = storage
            .create_metric_impl(CreateMetricRequest {
                name: "Light".to_string(),
                scale: 10,
            })
            .await
            .unwrap();
        storage
            .create_metric_impl(CreateMetricRequest {
                name: "Focus".to_string(),
                scale: 5,
            })
            .await
            .unwrap();

        let metrics = storage.list_metrics_impl().await.unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "Light");

        let updated = storage
            .update_metric_impl(
                light.id,
                UpdateMetricRequest {
                    name: None,
                    scale: Some(20),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.scale, 20);
        assert_eq!(updated.name, "Light");

        let unchanged = storage
            .update_metric_impl(
                light.id,
                UpdateMetricRequest {
                    name: None,
                    scale: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.scale, 20);

        assert!(storage.delete_metric_impl(light.id).await.unwrap());
        assert!(storage.get_metric_by_id_impl(light.id).await.unwrap().is_none());
        assert_eq!(storage.list_metrics_impl().await.unwrap().len(), 1);
    }
}
