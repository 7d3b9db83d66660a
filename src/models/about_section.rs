use sea_orm::entity::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::{
    boolean, integer, pk_auto, string, string_null, text, timestamp,
};

/// About-page sections keyed by a fixed section slug (hero, vision, mission,
/// overview, features, timeline). Saves upsert by id presence; missing
/// sections are filled from defaults on the reading side.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "academy_about_sections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    #[sea_orm(unique)]
    pub section: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub sort_order: i32,
    pub active: bool,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entity)
                    .if_not_exists()
                    .col(pk_auto(Column::Id))
                    .col(string(Column::Section).char_len(32))
                    .col(string(Column::Title).char_len(300))
                    .col(text(Column::Content))
                    .col(string_null(Column::Image).char_len(500))
                    .col(integer(Column::SortOrder).default(0))
                    .col(boolean(Column::Active).default(true))
                    .col(timestamp(Column::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_academy_about_sections_section")
                    .table(Entity)
                    .col(Column::Section)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
