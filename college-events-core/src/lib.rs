//! Core of the college events board.
//!
//! This crate provides:
//! - `Event` and `NewEvent` records
//! - `EventStore`, a JSON-file backed store with search, filter,
//!   upcoming-window and recommendation queries
//! - `EventsConfig` for locating the store file

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
mod lock;
pub mod recommend;
pub mod store;

pub use config::EventsConfig;
pub use date_range::DateRange;
pub use error::{EventsError, EventsResult};
pub use event::{Event, EventId, NewEvent};
pub use filter::{EventFilter, TextQuery};
pub use recommend::Recommender;
pub use store::EventStore;
