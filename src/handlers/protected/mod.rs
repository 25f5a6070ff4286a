// handlers/protected/mod.rs - Handlers behind jwt_auth_middleware
//
// Every handler here receives the caller as Extension<AuthUser>.
pub mod account;
pub mod watchlists;
