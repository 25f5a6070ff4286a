// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation and token acquisition.
pub mod auth;
pub mod system;
