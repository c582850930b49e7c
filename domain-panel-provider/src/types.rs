use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::{date, wire};

// ============ Domain Records ============

/// Lifecycle status reported by the domain service.
///
/// Any status string this crate does not know, and a missing status, map to
/// [`Unknown`](Self::Unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Ownership verified; the domain is tracked.
    Verified,
    /// Verification still outstanding.
    Pending,
    /// Registration has lapsed.
    Expired,
    /// Unrecognised or missing status.
    #[default]
    Unknown,
}

impl DomainStatus {
    /// Map a wire status string.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "verified" => Self::Verified,
            "pending" => Self::Pending,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// Whether records with this status are displayed and counted.
    #[must_use]
    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Verified | Self::Expired)
    }
}

/// Free-form billing details attached to a domain.
///
/// Every field is optional text. Values that arrive as numbers or booleans
/// are kept in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingInfo {
    /// Registrar name.
    #[serde(default, deserialize_with = "wire::free_text")]
    pub registrar: Option<String>,
    /// Renewal price, already formatted by the service (e.g. `"$9.99/yr"`).
    #[serde(default, deserialize_with = "wire::free_text")]
    pub renewal_price: Option<String>,
    /// Registration end date as sent by the service.
    #[serde(default, deserialize_with = "wire::free_text")]
    pub end_date: Option<String>,
    /// Semicolon-delimited tags.
    #[serde(default, deserialize_with = "wire::free_text")]
    pub notes: Option<String>,
}

/// One tracked domain, as returned by `GET /api/v1/domains?scope=public`.
///
/// Wire fields that are not consumed (`VerifyToken`, `CreatedAt`,
/// `UpdatedAt`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Stable identifier.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Domain name, used as the display key and the link target.
    #[serde(rename = "Domain")]
    pub name: String,
    /// Lifecycle status.
    #[serde(rename = "Status", default, deserialize_with = "wire::status")]
    pub status: DomainStatus,
    /// Billing details; `None` when absent, `null` or not an object.
    #[serde(
        rename = "BillingData",
        default,
        deserialize_with = "wire::billing",
        skip_serializing_if = "Option::is_none"
    )]
    pub billing_info: Option<BillingInfo>,
    /// Days until expiry; negative once expired, `None` when unknown.
    ///
    /// This is the authoritative urgency input. It is not reconciled with
    /// `billing_info.end_date`.
    #[serde(
        default,
        deserialize_with = "wire::days",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_in_days: Option<i64>,
}

impl DomainRecord {
    /// Whether the record is displayed and counted (`verified` or `expired`).
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.status.is_eligible()
    }

    /// Outbound link: scheme plus the raw domain name, no encoding.
    #[must_use]
    pub fn link_url(&self) -> String {
        format!("https://{}", self.name)
    }

    /// Registrar, if known.
    #[must_use]
    pub fn registrar(&self) -> Option<&str> {
        self.billing_info.as_ref()?.registrar.as_deref()
    }

    /// Renewal price, if known.
    #[must_use]
    pub fn renewal_price(&self) -> Option<&str> {
        self.billing_info.as_ref()?.renewal_price.as_deref()
    }

    /// Registration end date, when present and parseable.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.billing_info
            .as_ref()?
            .end_date
            .as_deref()
            .and_then(date::parse_calendar_date)
    }

    /// Note tags: `notes` split on `;`, trimmed, empties dropped.
    #[must_use]
    pub fn note_tags(&self) -> Vec<&str> {
        self.billing_info
            .as_ref()
            .and_then(|b| b.notes.as_deref())
            .map(|notes| {
                notes
                    .split(';')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
