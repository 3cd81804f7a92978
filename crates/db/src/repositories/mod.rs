//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod element_repo;
pub mod layer_repo;
pub mod map_repo;
pub mod site_repo;
pub mod viewport_history_repo;
pub mod viewport_repo;

pub use element_repo::ElementRepo;
pub use layer_repo::LayerRepo;
pub use map_repo::MapRepo;
pub use site_repo::SiteRepo;
pub use viewport_history_repo::ViewportHistoryRepo;
pub use viewport_repo::ViewportRepo;
