//! Storage layer abstraction.
//!
//! One contract ([`BoardStore`], split per entity into [`ItemStore`],
//! [`StatusStore`], [`NoteStore`] and [`UserStore`]) with two engines:
//!
//! - [`MemDbStore`]: transactional in-process store (`redb`)
//! - [`SqliteStore`]: relational store (`SQLite`)
//!
//! Both engines share the [`mapper`] for row conversion, the [`integrity`]
//! checks, and the id/timestamp defaults applied before a write, so the same
//! sequence of calls yields the same records and the same errors on either.

// Allow significant_drop_tightening - dropping database connections slightly early
// provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

mod context;
pub mod defaults;
mod factory;
pub mod integrity;
pub mod mapper;
pub mod memdb;
pub mod metrics;
pub(crate) mod prepare;
pub mod sqlite;
pub mod traits;
mod unimplemented;

pub use context::OpContext;
pub use defaults::{default_statuses, seed_default_statuses};
pub use factory::open_store;
pub use memdb::MemDbStore;
pub use sqlite::SqliteStore;
pub use traits::{BoardStore, ItemStore, NoteStore, StatusStore, UserStore};
pub use unimplemented::UnimplementedStore;
