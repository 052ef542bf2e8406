pub use sea_orm_migration::prelude::*;

mod m20240215_000001_create_coupons_table;
mod m20240215_000002_create_users_table;
mod m20240215_000003_create_items_table;
mod m20240215_000004_create_orders_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240215_000001_create_coupons_table::Migration),
            Box::new(m20240215_000002_create_users_table::Migration),
            Box::new(m20240215_000003_create_items_table::Migration),
            Box::new(m20240215_000004_create_orders_table::Migration),
        ]
    }
}
