use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::CouponCode)
                            .string()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::ExpiryDate).timestamp().not_null())
                    .col(ColumnDef::new(Coupons::UsageType).string().not_null())
                    .col(
                        ColumnDef::new(Coupons::ApplicableCategories)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Coupons::ApplicableMedicineIds)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::MinOrderValue)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Coupons::ValidTimeWindow).string().null())
                    .col(ColumnDef::new(Coupons::TermsAndConditions).text().null())
                    .col(ColumnDef::new(Coupons::DiscountType).string().not_null())
                    .col(
                        ColumnDef::new(Coupons::DiscountValue)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Coupons::MaxUsagePerUser)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Coupons::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // The listing query filters on (expiry_date, min_order_value)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_coupons_expiry_min_order")
                    .table(Coupons::Table)
                    .col(Coupons::ExpiryDate)
                    .col(Coupons::MinOrderValue)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Coupons {
    Table,
    CouponCode,
    ExpiryDate,
    UsageType,
    ApplicableCategories,
    ApplicableMedicineIds,
    MinOrderValue,
    ValidTimeWindow,
    TermsAndConditions,
    DiscountType,
    DiscountValue,
    MaxUsagePerUser,
    CreatedAt,
}
