pub mod ai;
pub mod auth;
pub mod bike;
pub mod category;
pub mod maintenance;
pub mod timestamp;
pub mod user;

pub use ai::*;
pub use auth::*;
pub use bike::*;
pub use category::*;
pub use maintenance::*;
pub use user::*;
