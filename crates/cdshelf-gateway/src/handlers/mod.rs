mod discs;
mod health;
mod view;

pub use discs::{get_disc_handler, list_discs_handler, missing_item_id_handler};
pub use health::health_handler;
pub use view::view_discs_handler;
