pub mod admin;
pub mod auth;
pub mod health;
pub mod profile;

pub use self::auth::model::{TokenCheckRequest, TokenCheckResponse};
