use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use cdshelf_core::DiscRecord;

pub async fn list_discs_handler(
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DiscRecord>>> {
    let discs = state.catalog().list_discs(&account_id).await?;
    Ok(Json(discs))
}

pub async fn get_disc_handler(
    Path(item_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DiscRecord>> {
    let disc = state.catalog().get_disc(&item_id).await?;
    Ok(Json(disc))
}

pub async fn missing_item_id_handler() -> AppError {
    AppError::MissingItemId
}
