use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Orders::OrderStatus)
                            .string()
                            .not_null()
                            .default("placed"),
                    )
                    .col(ColumnDef::new(Orders::OrderedAt).timestamp().not_null())
                    .col(ColumnDef::new(Orders::CouponCodeUsed).string().null())
                    .col(
                        ColumnDef::new(Orders::AmountPaid)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .to_owned(),
            )
            .await?;

        // The usage gate counts orders by (coupon_code_used, user_id)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_coupon_usage")
                    .table(Orders::Table)
                    .col(Orders::CouponCodeUsed)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    UserId,
    OrderStatus,
    OrderedAt,
    CouponCodeUsed,
    AmountPaid,
}
