//! Migration to create the payments table
//!
//! `order_id` and `payment_key` carry unique indexes so a retried or
//! concurrent confirmation can never record the same charge twice.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(string(Payments::SellerId).not_null())
                    .col(string(Payments::ProductId).not_null())
                    .col(big_integer(Payments::Amount).not_null())
                    .col(string(Payments::PaymentKey).not_null())
                    .col(string(Payments::OrderId).not_null())
                    .col(string_len(Payments::Status, 16).not_null())
                    .col(json_null(Payments::GatewayResponse))
                    .col(timestamp_with_time_zone(Payments::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_product_id")
                            .from(Payments::Table, Payments::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_order_id")
                    .table(Payments::Table)
                    .col(Payments::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_payment_key")
                    .table(Payments::Table)
                    .col(Payments::PaymentKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_seller_id")
                    .table(Payments::Table)
                    .col(Payments::SellerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    SellerId,
    ProductId,
    Amount,
    PaymentKey,
    OrderId,
    Status,
    GatewayResponse,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
