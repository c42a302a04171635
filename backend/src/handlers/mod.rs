//! HTTP handlers for the Flower Delivery Management Platform

mod category;
mod delivery;
mod health;
mod reporting;
mod supplier;

pub use category::*;
pub use delivery::*;
pub use health::*;
pub use reporting::*;
pub use supplier::*;
