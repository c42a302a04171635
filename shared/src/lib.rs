//! Shared types and models for the Flower Delivery Management Platform
//!
//! This crate contains the reconciliation engine and the types shared
//! between the backend, the frontend (via WASM), and other components of
//! the system.

pub mod draft;
pub mod intake;
pub mod models;
pub mod normalize;
pub mod types;
pub mod validation;

pub use draft::*;
pub use intake::*;
pub use models::*;
pub use normalize::*;
pub use types::*;
pub use validation::*;
