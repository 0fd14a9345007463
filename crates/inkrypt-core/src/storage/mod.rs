//! Storage abstraction for Inkrypt.
//!
//! The repository talks to a [`RecordStore`]; what the store holds in
//! sensitive fields is ciphertext produced by the repository.
//!
//! ## Security
//!
//! The bundled [`SqliteStore`] additionally encrypts the whole database image
//! at rest with age, keyed by a passphrase derived from the session key.
//! Timestamps, ids and counts are visible inside that image once opened.

pub mod encryption;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::{ChangeFeed, RecordStore};
pub use types::{StoredEntry, StoredTemplate};
