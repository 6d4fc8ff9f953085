//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization).

mod error;
mod forward;
mod order;

pub use error::{DomainError, DomainResult};
pub use forward::{ForwardId, ForwardRecord, OwnerId};
pub use order::{OrderEntry, OrderUpdate};
