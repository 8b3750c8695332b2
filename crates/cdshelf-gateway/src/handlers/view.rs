use crate::error::Result;
use crate::state::AppState;
use crate::view::render_collection;
use axum::extract::{Path, State};
use axum::response::Html;

pub async fn view_discs_handler(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Html<String>> {
    let discs = state.catalog().list_discs(&account_id).await?;
    Ok(Html(render_collection(&discs, state.upstream_base_url())))
}
