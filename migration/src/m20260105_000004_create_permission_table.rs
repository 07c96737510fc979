use sea_orm_migration::{prelude::*, schema::*};

/// Permission codes every deployment starts with.
const SEEDED_CODES: [&str; 2] = ["movies:read", "movies:write"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Permission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permission::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_uniq(Permission::Code))
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(Permission::Table).columns([Permission::Code]);
        for code in SEEDED_CODES {
            seed.values_panic([code.into()]);
        }

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Permission::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Permission {
    Table,
    Id,
    Code,
}
