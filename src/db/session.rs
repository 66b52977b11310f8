use std::convert::Infallible;
use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rusqlite::Connection;
use tokio::sync::OwnedMutexGuard;

use crate::state::AppState;

/// Exclusive handle on the database connection for one request.
///
/// Taken as a handler argument; the connection is handed back when the
/// session is dropped, whichever way the handler returns.
pub struct Session(OwnedMutexGuard<Connection>);

impl Session {
    pub async fn acquire(state: &AppState) -> Self {
        Session(Arc::clone(&state.db).lock_owned().await)
    }
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session::acquire(state).await)
    }
}
