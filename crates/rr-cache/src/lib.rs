//! `rr-cache`: persisted caches for the route recommendation engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`store`]       | `KvStore` trait, `MemoryStore`, `DirStore`, `SqliteStore` |
//! | [`envelope`]    | `Envelope<T>`, `get_record`, `put_record`                |
//! | [`route_cache`] | `RouteCache`, `RouteKey`, `StalenessPolicy`              |
//! | [`error`]       | `CacheError`, `CacheResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag     | Effect                                                    |
//! |----------|-----------------------------------------------------------|
//! | `sqlite` | Enables `SqliteStore` via `rusqlite`.                     |
//!
//! Cache failures are never fatal: a corrupt or unreadable entry is a miss.

pub mod envelope;
pub mod error;
pub mod route_cache;
pub mod store;

#[cfg(test)]
mod tests;

pub use envelope::{Envelope, FORMAT_VERSION, get_record, put_record};
pub use error::{CacheError, CacheResult};
pub use route_cache::{ROUTE_SET_KIND, RouteCache, RouteKey, StalenessPolicy};
pub use store::{DirStore, KvStore, MemoryStore};

#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
