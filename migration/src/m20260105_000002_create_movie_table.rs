use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movie::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(timestamp_with_time_zone(Movie::CreatedAt))
                    .col(string(Movie::Title))
                    .col(integer(Movie::Year))
                    .col(integer(Movie::Runtime))
                    .col(text(Movie::Genres))
                    .col(integer(Movie::Version))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Movie {
    Table,
    Id,
    CreatedAt,
    Title,
    Year,
    Runtime,
    Genres,
    Version,
}
