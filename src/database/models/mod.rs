pub mod user;
pub mod watchlist;

pub use user::{NewUser, User, UserPatch, UserRow};
pub use watchlist::{Comment, Watchlist, WatchlistPatch, WatchlistRow};
