use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::store::StoreError;

pub async fn connect_db(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
