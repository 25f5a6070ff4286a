// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth via jwt_auth_middleware)
pub mod protected;
pub mod public;
