//! One-shot toast notifications carried across a redirect.

use tower_sessions::Session;
use tracing::warn;

use crate::models::session_keys;
use crate::query::Toast;

/// Queue a toast for the next rendered page.
pub async fn push(session: &Session, toast: Toast) {
    let mut queued = peek(session).await;
    queued.push(toast);
    if let Err(e) = session.insert(session_keys::FLASH, &queued).await {
        warn!(error = %e, "failed to queue toast");
    }
}

/// Remove and return every queued toast.
pub async fn take(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(session_keys::FLASH).await {
        Ok(toasts) => toasts.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "failed to read queued toasts");
            Vec::new()
        }
    }
}

async fn peek(session: &Session) -> Vec<Toast> {
    session
        .get::<Vec<Toast>>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_toasts_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push(&session, Toast::success("Item created")).await;
        push(&session, Toast::error("Outlet name is required")).await;

        let toasts = take(&session).await;
        assert_eq!(
            toasts,
            vec![
                Toast::success("Item created"),
                Toast::error("Outlet name is required")
            ]
        );
        assert!(take(&session).await.is_empty());
    }
}
