//! Business logic services for the Flower Delivery Management Platform

pub mod category;
pub mod delivery;
pub mod reporting;
pub mod supplier;

pub use category::CategoryService;
pub use delivery::DeliveryService;
pub use reporting::ReportingService;
pub use supplier::SupplierService;
