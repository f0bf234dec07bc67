pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::metrics::requests::{CreateMetricRequest, UpdateMetricRequest};
use crate::storage::Storage;

pub struct MetricService {
    storage: Option<Arc<dyn Storage>>,
}

impl MetricService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_metrics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_metrics(self, request).await
    }

    pub async fn create_metric(
        &self,
        metric_data: CreateMetricRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_metric(self, metric_data, request).await
    }

    pub async fn update_metric(
        &self,
        metric_id: i64,
        update_data: UpdateMetricRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_metric(self, metric_id, update_data, request).await
    }

    // 删除维度，其下投票一并删除
    pub async fn delete_metric(
        &self,
        metric_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_metric(self, metric_id, request).await
    }
}
