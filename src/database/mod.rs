pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, PgStore};
pub use memory::MemoryStore;
pub use store::{IdGenerator, LikeStore, Store, UserStore, UuidGenerator, WatchlistStore};
