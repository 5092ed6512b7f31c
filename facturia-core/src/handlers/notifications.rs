use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use uuid::Uuid;

use crate::models::QueuedNotification;
use crate::store::AppAction;
use crate::workspace::Workspace;

/// Queued notifications, newest first.
pub async fn list(Extension(ws): Extension<Workspace>) -> Json<Vec<QueuedNotification>> {
    Json(ws.store.read(|s| s.notifications.clone()).await)
}

pub async fn mark_read(Extension(ws): Extension<Workspace>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    ensure_exists(&ws, id).await?;
    ws.store.dispatch(AppAction::MarkNotificationRead(id)).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(Extension(ws): Extension<Workspace>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    ensure_exists(&ws, id).await?;
    ws.store.dispatch(AppAction::RemoveNotification(id)).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear(Extension(ws): Extension<Workspace>) -> StatusCode {
    ws.store.dispatch(AppAction::ClearNotifications).await;
    StatusCode::NO_CONTENT
}

async fn ensure_exists(ws: &Workspace, id: Uuid) -> Result<(), StatusCode> {
    let found = ws
        .store
        .read(|s| s.notifications.iter().any(|n| n.id == id))
        .await;
    if found {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
