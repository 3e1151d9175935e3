pub mod orders;
pub mod payments;
pub mod products;

use actix_web::web;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

/// Runs a blocking service call on actix's thread pool.
///
/// The call's token is cancelled when this future is dropped (the client went
/// away) or when the configured request timeout elapses, which makes the
/// running unit of work roll back at its next statement.
pub(crate) async fn run_blocking<T, F>(state: &web::Data<AppState>, work: F) -> Result<T, AppError>
where
    F: FnOnce(&AppState, &CancellationToken) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let app = state.clone();
    let job = web::block(move || work(app.get_ref(), &cancel));

    match tokio::time::timeout(state.request_timeout, job).await {
        Ok(joined) => {
            let outcome = joined.map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(outcome?)
        }
        Err(_) => {
            log::warn!("request exceeded {:?}, cancelling", state.request_timeout);
            Err(AppError::Timeout)
        }
    }
}
