//! Create follow_edges table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowEdges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowEdges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FollowEdges::FollowerId).integer().not_null())
                    .col(ColumnDef::new(FollowEdges::FollowedId).integer().not_null())
                    .check(
                        Expr::col(FollowEdges::FollowerId).ne(Expr::col(FollowEdges::FollowedId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_edges_follower")
                            .from(FollowEdges::Table, FollowEdges::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_edges_followed")
                            .from(FollowEdges::Table, FollowEdges::FollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (follower_id, followed_id) - prevent duplicate follows
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edges_follower_followed")
                    .table(FollowEdges::Table)
                    .col(FollowEdges::FollowerId)
                    .col(FollowEdges::FollowedId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: followed_id (for listing followers)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edges_followed_id")
                    .table(FollowEdges::Table)
                    .col(FollowEdges::FollowedId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowEdges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowEdges {
    Table,
    Id,
    FollowerId,
    FollowedId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
