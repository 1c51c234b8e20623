use axum::extract::State;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    extract::{Json, Path},
    models::{CalendarEvent, CreateEventRequest, EventList, Message},
    services::calendar,
};

/// list_events
///
/// [Authenticated Route] The caller's events by start time.
#[utoipa::path(
    get,
    path = "/api/v1/calendar/events",
    responses((status = 200, description = "Events", body = EventList))
)]
pub async fn list_events(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<EventList>> {
    Ok(Json(calendar::list_events(state.repo.as_ref(), id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/calendar/events",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Created", body = CalendarEvent),
        (status = 400, description = "Empty title or end before start")
    )
)]
pub async fn create_event(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> AppResult<Json<CalendarEvent>> {
    Ok(Json(
        calendar::create_event(state.repo.as_ref(), id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/calendar/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Deleted", body = Message),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_event(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    calendar::delete_event(state.repo.as_ref(), id, user_id).await?;
    Ok(Json(Message::new("Event deleted successfully")))
}
