pub mod list;
pub mod mine;
pub mod recorder;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::votes::requests::{CastVotesRequest, JudgedPhotoQuery, VoteListQuery};
use crate::storage::Storage;

pub struct VoteService {
    storage: Option<Arc<dyn Storage>>,
}

impl VoteService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 评委首次提交评分
    pub async fn submit_votes(
        &self,
        vote_data: CastVotesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_votes(self, vote_data, request).await
    }

    // 评委修改评分
    pub async fn update_votes(
        &self,
        vote_data: CastVotesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_votes(self, vote_data, request).await
    }

    pub async fn list_votes(
        &self,
        query: VoteListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_votes(self, query, request).await
    }

    // 当前评委已评过的照片
    pub async fn list_mine(
        &self,
        query: JudgedPhotoQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mine::list_mine(self, query, request).await
    }
}
