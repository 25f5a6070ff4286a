// handlers/public/auth/mod.rs - Public authentication handlers

use serde::Deserialize;

pub mod login; // POST /auth/login - authenticate and get JWT
pub mod register; // POST /users - create new account

pub use login::login_post;
pub use register::register_post;

/// Body shared by registration and login
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
