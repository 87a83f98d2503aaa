//! Time-stamped key/value cache
//!
//! [`TtlCache`] never evicts on its own. Each entry remembers when it was
//! last stored and callers ask [`TtlCache::is_old`] (or use
//! [`TtlCache::fetch_fresh`]) to decide whether to refetch. Keys are
//! normalized before every operation: surrounding spaces, `\r` and `\n` are
//! trimmed and the rest is lowercased, so `" Systems\n"` and `"systems"`
//! address the same entry.
//!
//! ```
//! use std::time::Duration;
//!
//! use spacetraders_common::cache::TtlCache;
//!
//! let cache: TtlCache<Vec<u32>> = TtlCache::new(Duration::from_secs(600));
//! cache.store("Systems", vec![1, 2, 3]);
//! assert_eq!(cache.fetch(" systems\n"), Some(vec![1, 2, 3]));
//! assert!(!cache.is_old("systems"));
//! ```

pub mod core;
pub mod stats;

pub use self::core::{normalize_key, TtlCache};
pub use self::stats::CacheStats;
