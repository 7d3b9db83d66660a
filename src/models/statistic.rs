use crate::content::STATISTIC_DEFAULTS;
use sea_orm::entity::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::{integer, pk_auto, string};

/// Counter rows shown on the home page. The key set is fixed at seed time
/// (students, teachers, classrooms, books, computers); the API updates values
/// but never adds or removes rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "academy_statistics")]
pub struct Model {
    #[serde(skip_serializing)]
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    #[sea_orm(unique)]
    pub key: String,
    pub value: i32,
    pub label: String,
    pub suffix: String,
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
                    .col(string(Column::Key).char_len(32))
                    .col(integer(Column::Value).default(0))
                    .col(string(Column::Label).char_len(96))
                    .col(string(Column::Suffix).char_len(16).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_academy_statistics_key")
                    .table(Entity)
                    .col(Column::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Seed the fixed key set so a fresh database renders real numbers.
        let mut insert = Query::insert()
            .into_table(Entity)
            .columns([Column::Key, Column::Value, Column::Label, Column::Suffix])
            .to_owned();
        for default in STATISTIC_DEFAULTS {
            insert.values_panic([
                default.key.into(),
                default.value.into(),
                default.label.into(),
                default.suffix.into(),
            ]);
        }
        manager.exec_stmt(insert).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
