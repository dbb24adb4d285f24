pub mod assert;
#[cfg(test)]
pub mod testing;

use crate::{error::ApiError, DbPool};
use actix_web::web;
use anyhow::Context;
use diesel::{
    prelude::*,
    r2d2::ConnectionManager,
    sql_types::{BigInt, Unsigned},
    MysqlConnection,
};
use r2d2::PooledConnection;

define_sql_function! {
    fn last_insert_id() -> Unsigned<BigInt>;
}

pub fn build_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<MysqlConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)
        .context("Failed to create pool")
}

pub fn get_db_conn(
    pool: &web::Data<DbPool>,
) -> anyhow::Result<PooledConnection<ConnectionManager<MysqlConnection>>> {
    pool.get().context("DB connection")
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub async fn with_conn<F, R>(pool: &web::Data<DbPool>, f: F) -> Result<R, ApiError>
where
    F: FnOnce(&mut MysqlConnection) -> Result<R, ApiError> + Send + 'static,
    R: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = get_db_conn(&pool)?;
        f(&mut conn)
    })
    .await
    .context("DB error")?
}

/// Id generated by the last insert on this connection.
pub fn inserted_id(conn: &mut MysqlConnection) -> Result<i32, ApiError> {
    let id = diesel::select(last_insert_id()).get_result::<u64>(conn)?;
    let id = i32::try_from(id).context("inserted id out of range")?;
    Ok(id)
}
