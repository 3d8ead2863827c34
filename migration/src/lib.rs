pub use sea_orm_migration::prelude::*;

mod base;
mod m20261001_090000_identity;
mod m20261001_091000_tenancy;
mod m20261001_092000_billing;
mod m20261001_093000_audit_trail;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_090000_identity::Migration),
            Box::new(m20261001_091000_tenancy::Migration),
            Box::new(m20261001_092000_billing::Migration),
            Box::new(m20261001_093000_audit_trail::Migration),
        ]
    }
}
