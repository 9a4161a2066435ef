//! Creates the tables backing the entities.
//!
//! Used by the server when `AUTO_MIGRATE` is enabled and by the tests, which run
//! against an in-memory SQLite database.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::entity::prelude::*;

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

#[tracing::instrument(name = "schema::ensure_schema", skip(db))]
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Order rows must exist before the item table references them.
    create_table(db, Order).await?;
    create_table(db, OrderItem).await?;
    create_table(db, Notification).await?;
    create_table(db, AdminUser).await?;
    create_table(db, Customer).await?;
    create_table(db, Product).await?;
    tracing::info!("Database schema ready");
    Ok(())
}
