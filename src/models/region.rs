//! Tax region model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tax jurisdiction with its own statutory rule set.
///
/// Regions are created by administrative seeding and are never deleted
/// while rules reference them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRegion {
    /// Unique region code (e.g., "KE").
    pub code: String,
    /// Human-readable region name.
    pub name: String,
    /// ISO currency code payslips are denominated in.
    pub currency: String,
    /// Flat monthly credit subtracted from the computed income-tax line,
    /// never driving it below zero.
    pub personal_relief: Decimal,
    /// Whether the region is available for payroll runs.
    pub is_active: bool,
    /// When the region row was last updated.
    pub updated_at: DateTime<Utc>,
}
