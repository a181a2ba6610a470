//! Database migration runner.

use sea_orm::DbErr;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::migration::Migrator;

use super::DbPool;

impl DbPool {
    /// Bring the schema in line with the entity definitions.
    ///
    /// Applied migrations are tracked by SeaORM, so this is safe to call on
    /// every boot.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        let pending = Migrator::get_pending_migrations(self.connection()).await?;

        if pending.is_empty() {
            info!("No pending migrations");
            return Ok(());
        }

        info!("{} migration(s) pending", pending.len());
        Migrator::up(self.connection(), None).await?;
        info!("Migrations applied successfully");

        Ok(())
    }
}
