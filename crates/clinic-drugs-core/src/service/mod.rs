//! Drug management rules on top of an [`InventoryStore`](crate::db::InventoryStore).

mod drugs;
mod error;

pub use drugs::*;
pub use error::*;
