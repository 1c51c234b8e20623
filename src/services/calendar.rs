use chrono::Utc;
use uuid::Uuid;

use super::required;
use crate::{
    error::{AppError, AppResult},
    models::{CalendarEvent, CreateEventRequest, EventList},
    repository::Repository,
};

pub async fn create_event(
    repo: &dyn Repository,
    user_id: Uuid,
    req: CreateEventRequest,
) -> AppResult<CalendarEvent> {
    let title = required(&req.title, "title")?;
    if req.end_time < req.start_time {
        return Err(AppError::validation("end_time must not be before start_time"));
    }

    let now = Utc::now();
    let event = repo
        .create_event(CalendarEvent {
            id: Uuid::new_v4(),
            title,
            description: req.description,
            start_time: req.start_time,
            end_time: req.end_time,
            all_day: req.all_day,
            user_id,
            created_at: now,
            updated_at: now,
        })
        .await?;
    Ok(event)
}

/// list_events
///
/// The caller's events ordered by `start_time`.
pub async fn list_events(repo: &dyn Repository, user_id: Uuid) -> AppResult<EventList> {
    Ok(repo.list_events(user_id).await?.into())
}

pub async fn delete_event(repo: &dyn Repository, id: Uuid, user_id: Uuid) -> AppResult<()> {
    let event = repo
        .get_event(id)
        .await?
        .ok_or_else(|| AppError::not_found("event not found"))?;
    if event.user_id != user_id {
        return Err(AppError::authorization("not enough permissions"));
    }

    if !repo.delete_event(id, user_id).await? {
        return Err(AppError::not_found("event not found"));
    }
    Ok(())
}
