//! Delivery models and wire payloads

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RejectionRecord, Supplier};

/// Export stem-length buckets, ordered shortest to longest with the
/// "sobrante" catch-all last
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SizeKey {
    #[serde(rename = "cm_40")]
    Cm40,
    #[serde(rename = "cm_50")]
    Cm50,
    #[serde(rename = "cm_60")]
    Cm60,
    #[serde(rename = "cm_70")]
    Cm70,
    #[serde(rename = "cm_80")]
    Cm80,
    #[serde(rename = "cm_90")]
    Cm90,
    #[serde(rename = "cm_100")]
    Cm100,
    #[serde(rename = "cm_110")]
    Cm110,
    #[serde(rename = "cm_120")]
    Cm120,
    #[serde(rename = "overflow")]
    Overflow,
}

impl SizeKey {
    pub const ALL: [SizeKey; 10] = [
        SizeKey::Cm40,
        SizeKey::Cm50,
        SizeKey::Cm60,
        SizeKey::Cm70,
        SizeKey::Cm80,
        SizeKey::Cm90,
        SizeKey::Cm100,
        SizeKey::Cm110,
        SizeKey::Cm120,
        SizeKey::Overflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKey::Cm40 => "cm_40",
            SizeKey::Cm50 => "cm_50",
            SizeKey::Cm60 => "cm_60",
            SizeKey::Cm70 => "cm_70",
            SizeKey::Cm80 => "cm_80",
            SizeKey::Cm90 => "cm_90",
            SizeKey::Cm100 => "cm_100",
            SizeKey::Cm110 => "cm_110",
            SizeKey::Cm120 => "cm_120",
            SizeKey::Overflow => "overflow",
        }
    }

    /// Stem length in centimeters; `None` for the overflow bucket
    pub fn centimeters(&self) -> Option<u16> {
        match self {
            SizeKey::Cm40 => Some(40),
            SizeKey::Cm50 => Some(50),
            SizeKey::Cm60 => Some(60),
            SizeKey::Cm70 => Some(70),
            SizeKey::Cm80 => Some(80),
            SizeKey::Cm90 => Some(90),
            SizeKey::Cm100 => Some(100),
            SizeKey::Cm110 => Some(110),
            SizeKey::Cm120 => Some(120),
            SizeKey::Overflow => None,
        }
    }
}

/// Parse a wire size key back into the enum
pub fn size_key_from_str(s: &str) -> Option<SizeKey> {
    SizeKey::ALL.iter().copied().find(|k| k.as_str() == s)
}

/// A persisted delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub entry_datetime: DateTime<Utc>,
    pub entries: Vec<DeliveryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One persisted line-item of a delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub id: Uuid,
    pub species_name: String,
    pub variety_name: String,
    pub quantity: u32,
    pub exportable: BTreeMap<SizeKey, u32>,
    pub prices: BTreeMap<SizeKey, Decimal>,
    pub total_price: Decimal,
    pub rejections: Vec<RejectionRecord>,
}

/// Summary of an already-logged delivery, shown in the duplicate dialog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExistingDelivery {
    pub id: Uuid,
    pub entry_datetime: DateTime<Utc>,
    pub total_entries: i64,
    pub total_stems: i64,
}

/// Response of `POST /suppliers/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSupplierResponse {
    pub found: bool,
    pub supplier: Option<Supplier>,
    pub existing_delivery: Option<ExistingDelivery>,
    pub message: Option<String>,
}

/// Response of `POST /suppliers/quick`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSupplierResponse {
    pub success: bool,
    pub supplier: Option<Supplier>,
    pub errors: Option<BTreeMap<String, String>>,
    pub message: Option<String>,
}

/// One line-item as submitted on save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPayload {
    pub species_name: String,
    pub variety_name: String,
    pub quantity: u32,
    pub exportable: BTreeMap<SizeKey, u32>,
    pub prices: BTreeMap<SizeKey, Decimal>,
    pub total_price: Decimal,
    pub rejections: Vec<RejectionRecord>,
}

impl EntryPayload {
    pub fn exportable_total(&self) -> u32 {
        self.exportable.values().sum()
    }

    pub fn local_total(&self) -> u32 {
        self.rejections.iter().map(|r| r.quantity).sum()
    }

    pub fn classified_total(&self) -> u32 {
        self.exportable_total() + self.local_total()
    }

    /// `quantity - classified`; negative flags over-classification
    pub fn remaining(&self) -> i64 {
        i64::from(self.quantity) - i64::from(self.classified_total())
    }
}

/// Body of `POST /deliveries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDeliveryInput {
    pub supplier_id: Uuid,
    pub delivery_date: NaiveDate,
    pub delivery_time: NaiveTime,
    pub entries: Vec<EntryPayload>,
}

/// Body of `PUT /deliveries/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDeliveryInput {
    pub entries: Vec<EntryPayload>,
}

/// Ack for a save, with advisory reconciliation warnings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDeliveryResponse {
    pub id: Uuid,
    pub warnings: Vec<String>,
}
