use sea_orm_migration::prelude::*;

use crate::m20241007_000001_create_tables::Votes;

/// 同一评委对同一照片的同一维度只能有一条投票
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_votes_user_photo_metric")
                    .table(Votes::Table)
                    .col(Votes::UserId)
                    .col(Votes::PhotoId)
                    .col(Votes::MetricId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_votes_user_photo_metric")
                    .table(Votes::Table)
                    .to_owned(),
            )
            .await
    }
}
