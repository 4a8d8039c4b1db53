//! Domain models for the clinic drug inventory.

mod clinic;
mod drug;
mod prescription;
mod stock;

pub use clinic::*;
pub use drug::*;
pub use prescription::*;
pub use stock::*;
