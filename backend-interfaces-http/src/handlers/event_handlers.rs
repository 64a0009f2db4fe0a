use axum::extract::{Query, State};
use axum::Json;

use backend_application::dtos::EventListQuery;
use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::Event;

use crate::error::HttpError;

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>, HttpError> {
    let events = event_queries::list_events(&state, query).await?;
    Ok(Json(events))
}

pub async fn list_event_ids(State(state): State<AppState>) -> Result<Json<Vec<i64>>, HttpError> {
    let ids = event_queries::list_event_ids(&state).await?;
    Ok(Json(ids))
}
