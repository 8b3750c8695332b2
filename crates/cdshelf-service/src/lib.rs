//! Disc service: the read-through collection cache and on-demand detail
//! page extraction behind [`cdshelf_core::DiscCatalog`].

pub mod config;
pub mod normalize;
pub mod service;

pub use config::ServiceConfig;
pub use normalize::normalize_collection;
pub use service::DiscService;
