//! Validation utilities for the Flower Delivery Management Platform
//!
//! Includes Ecuador-specific validations for supplier registration.

use std::collections::BTreeMap;

use crate::models::QuickSupplierInput;

// ============================================================================
// Supplier Field Validations
// ============================================================================

/// Validate a supplier name: letters (accented included) and spaces only
pub fn validate_supplier_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if !trimmed.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err("Name may only contain letters and spaces");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate an Ecuadorian mobile/landline number: exactly 10 digits
pub fn validate_ecuador_phone(phone: &str) -> Result<(), &'static str> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone must be exactly 10 digits");
    }
    Ok(())
}

/// Validate an Ecuadorian RUC (tax id): exactly 13 digits
pub fn validate_ruc(ruc: &str) -> Result<(), &'static str> {
    if ruc.len() != 13 || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return Err("RUC must be exactly 13 digits");
    }
    Ok(())
}

/// Run every quick-supplier field check, collecting errors keyed by field.
///
/// The same map shape is used for server-side errors so both surfaces merge
/// into one display.
pub fn validate_quick_supplier(input: &QuickSupplierInput) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    if let Err(msg) = validate_supplier_name(&input.name) {
        errors.insert("name".to_string(), msg.to_string());
    }
    if let Err(msg) = validate_email(&input.email) {
        errors.insert("email".to_string(), msg.to_string());
    }
    if let Err(msg) = validate_ecuador_phone(&input.phone) {
        errors.insert("phone".to_string(), msg.to_string());
    }
    if let Err(msg) = validate_ruc(&input.ruc) {
        errors.insert("ruc".to_string(), msg.to_string());
    }
    errors
}
