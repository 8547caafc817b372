// `SchemaManager<'_>` clashes with the lifetimes async-trait generates for
// `MigrationTrait`, so elided lifetimes stay allowed in this module.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_products_table::Migration),
            Box::new(m20240101_000002_create_baskets_table::Migration),
            Box::new(m20240101_000003_create_basket_items_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(
                            // 16 is the widest precision the SQLite backend
                            // accepts.
                            ColumnDef::new(Products::Price)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::PictureUrl).string().not_null())
                        .col(ColumnDef::new(Products::ProductType).string().not_null())
                        .col(ColumnDef::new(Products::Brand).string().not_null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Products {
        Table,
        Id,
        Name,
        Price,
        PictureUrl,
        ProductType,
        Brand,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_baskets_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_baskets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Baskets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Baskets::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Baskets::BuyerId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Baskets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Baskets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_baskets_buyer_id")
                        .table(Baskets::Table)
                        .col(Baskets::BuyerId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Baskets::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Baskets {
        Table,
        Id,
        BuyerId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_basket_items_table {

    use super::m20240101_000001_create_products_table::Products;
    use super::m20240101_000002_create_baskets_table::Baskets;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_basket_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BasketItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BasketItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BasketItems::BasketId).uuid().not_null())
                        .col(ColumnDef::new(BasketItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(BasketItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(BasketItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BasketItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_basket_items_basket")
                                .from(BasketItems::Table, BasketItems::BasketId)
                                .to(Baskets::Table, Baskets::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_basket_items_product")
                                .from(BasketItems::Table, BasketItems::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Duplicate adds merge quantities, so a basket holds at most one
            // row per product.
            manager
                .create_index(
                    Index::create()
                        .name("idx_basket_items_basket_product")
                        .table(BasketItems::Table)
                        .col(BasketItems::BasketId)
                        .col(BasketItems::ProductId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BasketItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum BasketItems {
        Table,
        Id,
        BasketId,
        ProductId,
        Quantity,
        CreatedAt,
        UpdatedAt,
    }
}
