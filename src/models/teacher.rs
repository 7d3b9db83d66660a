use sea_orm::entity::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::{
    big_integer, integer_null, pk_auto, string, string_null, text,
};

/// Teacher profiles for the public teachers page. `tag_id` is a lookup-only
/// reference into the teacher tags table; there is no foreign key and no
/// cascade on tag deletion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "academy_teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    pub education: Option<String>,
    pub subject: Option<String>,
    pub experience: Option<String>,
    pub tag_id: i64,
    pub description: String,
    pub image: Option<String>,
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
                    .col(string(Column::Name).char_len(160))
                    .col(integer_null(Column::Age))
                    .col(string_null(Column::Education).char_len(200))
                    .col(string_null(Column::Subject).char_len(96))
                    .col(string_null(Column::Experience).char_len(96))
                    .col(big_integer(Column::TagId))
                    .col(text(Column::Description))
                    .col(string_null(Column::Image).char_len(500))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
