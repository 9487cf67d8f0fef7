//! Transaction helper for multi-statement writes.
//!
//! Compound mutations (role-template replacement, registration creation)
//! must be all-or-nothing; this wrapper commits on success and rolls back
//! on any error so no partial state is ever visible.

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};

use crate::Result;

/// Run `f` inside a database transaction, committing on `Ok` and rolling
/// back on `Err`.
///
/// The closure should only capture owned data; the transaction handle is
/// passed in by reference.
pub async fn with_transaction<F, R>(pool: &PgPool, f: F) -> Result<R>
where
    F: for<'t> FnOnce(&'t mut Transaction<'static, Postgres>) -> BoxFuture<'t, Result<R>> + Send,
    R: Send,
{
    let mut tx = pool.begin().await?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result)
        }
        Err(e) => {
            tx.rollback().await?;
            Err(e)
        }
    }
}
