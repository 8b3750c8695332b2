//! HTTP front end for the disc catalog: JSON API and an HTML view.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod view;

pub use app::App;
pub use state::AppState;
