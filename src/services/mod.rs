//! Domain services
//!
//! Each service borrows an [`ApiClient`](crate::client::ApiClient) and maps
//! one domain operation to one HTTP call. They hold no state.

pub mod ai;
pub mod auth;
pub mod bikes;
pub mod categories;
pub mod maintenance;

pub use ai::AiService;
pub use auth::AuthService;
pub use bikes::BikeService;
pub use categories::CategoryService;
pub use maintenance::MaintenanceService;
