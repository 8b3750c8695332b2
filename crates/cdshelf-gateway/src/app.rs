use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    get_disc_handler, health_handler, list_discs_handler, missing_item_id_handler,
    view_discs_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/discs/{account_id}", get(list_discs_handler))
                    .route("/disc", get(missing_item_id_handler))
                    .route("/disc/", get(missing_item_id_handler))
                    .route("/disc/{item_id}", get(get_disc_handler)),
            )
            .route("/view/{account_id}", get(view_discs_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
