use sea_orm_migration::{MigrationTrait, MigratorTrait};
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(super::setting::Migration),
            Box::new(super::statistic::Migration),
            Box::new(super::hero_slide::Migration),
            Box::new(super::teacher_tag::Migration),
            Box::new(super::teacher::Migration),
            Box::new(super::news_article::Migration),
            Box::new(super::about_section::Migration),
            Box::new(super::achievement::Migration),
        ]
    }
}
