//! API DTOs module
//!
//! This module contains all API data transfer objects organized by domain:
//! - `auth`: Google and guest login
//! - `user`: profile updates
//! - `bike`: bike create/update bodies
//! - `maintenance`: maintenance task bodies
//! - `ai`: AI question bodies

pub mod ai;
pub mod auth;
pub mod bike;
pub mod maintenance;
pub mod user;

pub use ai::*;
pub use auth::*;
pub use bike::*;
pub use maintenance::*;
pub use user::*;
