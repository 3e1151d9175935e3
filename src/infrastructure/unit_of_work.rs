use diesel::pg::PgConnection;
use diesel::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::db::DbPool;
use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

// ── Unit of work ─────────────────────────────────────────────────────────────

/// A connection inside an open transaction.
///
/// Statements reach the connection only through [`UnitOfWork::conn`], which
/// refuses to hand it out once the caller has cancelled.
pub struct UnitOfWork<'a> {
    conn: &'a mut PgConnection,
    cancel: &'a CancellationToken,
}

impl UnitOfWork<'_> {
    pub fn conn(&mut self) -> Result<&mut PgConnection, DomainError> {
        self.ensure_live()?;
        Ok(&mut *self.conn)
    }

    fn ensure_live(&self) -> Result<(), DomainError> {
        if self.cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        Ok(())
    }
}

/// Runs `work` in a single transaction.
///
/// Commits only when `work` succeeds and the token is still live afterwards;
/// any error, including cancellation, rolls back everything `work` wrote.
pub fn run<T, F>(pool: &DbPool, cancel: &CancellationToken, work: F) -> Result<T, DomainError>
where
    F: FnOnce(&mut UnitOfWork<'_>) -> Result<T, DomainError>,
{
    if cancel.is_cancelled() {
        return Err(DomainError::Cancelled);
    }
    let mut pooled = pool.get()?;
    let conn: &mut PgConnection = &mut pooled;

    conn.transaction::<_, DomainError, _>(|conn| {
        let mut uow = UnitOfWork { conn, cancel };
        let value = work(&mut uow)?;
        uow.ensure_live()?;
        Ok(value)
    })
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    use super::run;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::test_support::{insert_category, setup_db};
    use crate::schema::product_categories;

    fn category_count(pool: &crate::db::DbPool) -> i64 {
        let mut conn = pool.get().expect("Failed to get connection");
        product_categories::table
            .count()
            .get_result(&mut conn)
            .expect("count failed")
    }

    #[tokio::test]
    async fn commits_when_work_succeeds() {
        let (_container, pool) = setup_db().await;
        let cancel = CancellationToken::new();

        run(&pool, &cancel, |uow| {
            insert_category(uow.conn()?, "Ceramics");
            Ok(())
        })
        .expect("unit of work failed");

        assert_eq!(category_count(&pool), 1);
    }

    #[tokio::test]
    async fn rolls_back_when_work_fails() {
        let (_container, pool) = setup_db().await;
        let cancel = CancellationToken::new();

        let result: Result<(), _> = run(&pool, &cancel, |uow| {
            insert_category(uow.conn()?, "Ceramics");
            Err(DomainError::not_found("Product", Uuid::new_v4()))
        });

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(category_count(&pool), 0);
    }

    #[tokio::test]
    async fn rolls_back_when_cancelled_mid_way() {
        let (_container, pool) = setup_db().await;
        let cancel = CancellationToken::new();

        let result = run(&pool, &cancel, |uow| {
            insert_category(uow.conn()?, "Ceramics");
            cancel.cancel();
            insert_category(uow.conn()?, "Textiles");
            Ok(())
        });

        assert!(matches!(result, Err(DomainError::Cancelled)));
        assert_eq!(category_count(&pool), 0);
    }

    #[tokio::test]
    async fn rolls_back_when_cancelled_before_commit() {
        let (_container, pool) = setup_db().await;
        let cancel = CancellationToken::new();

        let result = run(&pool, &cancel, |uow| {
            insert_category(uow.conn()?, "Ceramics");
            cancel.cancel();
            Ok(())
        });

        assert!(matches!(result, Err(DomainError::Cancelled)));
        assert_eq!(category_count(&pool), 0);
    }

    #[tokio::test]
    async fn refuses_to_start_when_already_cancelled() {
        let (_container, pool) = setup_db().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run(&pool, &cancel, |_| Ok(()));

        assert!(matches!(result, Err(DomainError::Cancelled)));
    }
}
