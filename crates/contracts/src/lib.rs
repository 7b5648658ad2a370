//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Wire Model
//! - Schema types encode with the compact protocol from the `codec` crate
//! - Stored records are keyed by `Event::event_id`

#[macro_use]
mod macros;

mod config;
mod enums;
mod error;
mod event;
mod record_store;
mod submission;
mod transport;
mod wire;

pub use config::*;
pub use enums::*;
pub use error::*;
pub use event::*;
pub use record_store::*;
pub use submission::*;
pub use transport::*;
