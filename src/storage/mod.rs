use std::sync::Arc;

use crate::models::{
    metrics::{
        entities::Metric,
        requests::{CreateMetricRequest, UpdateMetricRequest},
    },
    photos::{
        entities::Photo,
        requests::{PhotoListQuery, UpdatePhotoRequest},
        responses::PhotoListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
    votes::{
        entities::{Rating, Vote},
        requests::{JudgedPhotoQuery, VoteListQuery},
        responses::JudgedPhotoListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（key 必须已确定）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过登录 key 获取用户信息
    async fn get_user_by_key(&self, key: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户（连同其投票）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 照片管理方法
    // 登记照片
    async fn create_photo(&self, username: &str, image_url: &str) -> Result<Photo>;
    // 通过ID获取照片
    async fn get_photo_by_id(&self, id: i64) -> Result<Option<Photo>>;
    // 分页列出照片
    async fn list_photos_with_pagination(&self, query: PhotoListQuery)
    -> Result<PhotoListResponse>;
    // 列出全部照片（按 ID 升序）
    async fn list_all_photos(&self, active: Option<bool>) -> Result<Vec<Photo>>;
    // 更新照片
    async fn update_photo(&self, id: i64, update: UpdatePhotoRequest) -> Result<Option<Photo>>;
    // 删除照片（连同其投票）
    async fn delete_photo(&self, id: i64) -> Result<bool>;
    // 评委尚未投过票的启用照片 ID（按 ID 升序）
    async fn list_eligible_photo_ids(&self, judge_id: i64) -> Result<Vec<i64>>;

    /// 评分维度管理方法
    async fn create_metric(&self, metric: CreateMetricRequest) -> Result<Metric>;
    async fn get_metric_by_id(&self, id: i64) -> Result<Option<Metric>>;
    async fn list_metrics(&self) -> Result<Vec<Metric>>;
    async fn update_metric(&self, id: i64, update: UpdateMetricRequest)
    -> Result<Option<Metric>>;
    // 删除维度（连同其投票）
    async fn delete_metric(&self, id: i64) -> Result<bool>;

    /// 投票方法
    // 在一个事务内写入一批新投票，已存在任一投票时整体失败
    async fn insert_votes(
        &self,
        judge_id: i64,
        photo_id: i64,
        ratings: &[Rating],
    ) -> Result<Vec<Vote>>;
    // 在一个事务内更新一批投票，缺失的行会被插入
    async fn upsert_votes(
        &self,
        judge_id: i64,
        photo_id: i64,
        ratings: &[Rating],
    ) -> Result<Vec<Vote>>;
    // 列出投票
    async fn list_votes(&self, query: VoteListQuery) -> Result<Vec<Vote>>;
    // 评委已评照片（分页）及其评分
    async fn list_judged_photos(
        &self,
        judge_id: i64,
        query: JudgedPhotoQuery,
    ) -> Result<JudgedPhotoListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
