use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Applies a server-side `statement_timeout` to every pooled connection so no
/// single statement can hold a blocking worker indefinitely.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout {
    millis: u64,
}

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET statement_timeout = {}", self.millis))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(
    database_url: &str,
    max_size: u32,
    statement_timeout_ms: u64,
) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(StatementTimeout {
            millis: statement_timeout_ms,
        }))
        .build(manager)
}
