use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};

use crate::api::error::{ApiError, AppResult};
use crate::api::state::AppState;
use crate::domain::model::{TicketQuery, TicketSearch, TicketsResponse};

/// GET /tickets?date=YYYYMMDD&from=<id>&to=<id>&startTime=HH:mm&endTime=HH:mm
///
/// 只有缺少 `date` 時回傳 400，其餘參數原樣轉給供應商
async fn list_tickets(
    State(state): State<AppState>,
    query: Result<Query<TicketQuery>, QueryRejection>,
) -> AppResult<Json<TicketsResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let search = TicketSearch::from_query(&query, &state.route_defaults)?;

    let tickets = state.finder.find_tickets(&search).await;
    Ok(Json(TicketsResponse { tickets }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tickets", get(list_tickets))
}
