// Wire types for the OffsetCF REST API
//
// Merchant and store resources use camelCase on the wire; the monthly
// summary endpoint uses snake_case. Field shapes mirror the JSON exactly;
// invariant checks (day coverage, totals) happen in `offsetcf-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Merchants ───────────────────────────────────────────────────────

/// A registered merchant account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /merchants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMerchant {
    pub name: String,
    pub email: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Partial body for `PUT /merchants/{id}`. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

// ── Stores & widget configuration ───────────────────────────────────

/// Corner of the storefront where the widget is anchored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Widget colour scheme. `Auto` follows the shopper's system preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WidgetTheme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// Appearance of the opt-in widget for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub position: WidgetPosition,
    pub theme: WidgetTheme,
    pub primary_color: String,
    pub text_color: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

/// A merchant's store with its embedded widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub merchant_id: String,
    pub name: String,
    pub domain: String,
    pub widget_config: WidgetConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /stores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub merchant_id: String,
    pub name: String,
    pub domain: String,
    pub widget_config: WidgetConfig,
}

/// Partial body for `PUT /stores/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_config: Option<WidgetConfig>,
}

// ── Opt-in monthly summary ──────────────────────────────────────────

/// One calendar day of opt-in activity. `day` is an ISO date (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOptInData {
    pub day: String,
    pub opt_ins: u64,
    pub estimated_offset: f64,
}

/// Aggregate totals as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub opt_ins: u64,
    pub estimated_offset: f64,
}

/// Response of `GET /v1/merchant/{storeId}/monthly-summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummaryResponse {
    pub store: String,
    pub month: String,
    pub currency: String,
    pub totals: SummaryTotals,
    #[serde(default)]
    pub daily: Vec<DailyOptInData>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn widget_enums_use_wire_spelling() {
        assert_eq!(
            serde_json::to_value(WidgetPosition::BottomRight).unwrap(),
            json!("bottom-right")
        );
        assert_eq!(serde_json::to_value(WidgetTheme::Auto).unwrap(), json!("auto"));
        assert_eq!(WidgetPosition::TopLeft.to_string(), "top-left");
        assert_eq!(
            WidgetPosition::from_str("top-right").unwrap(),
            WidgetPosition::TopRight
        );
        assert!(WidgetTheme::from_str("neon").is_err());
    }

    #[test]
    fn store_deserializes_camel_case() {
        let store: Store = serde_json::from_value(json!({
            "id": "s-1",
            "merchantId": "m-1",
            "name": "My E-commerce Store",
            "domain": "mystore.com",
            "widgetConfig": {
                "position": "bottom-right",
                "theme": "auto",
                "primaryColor": "#10b981",
                "textColor": "#ffffff",
                "enabled": true,
                "customMessage": "Help us offset carbon emissions!"
            },
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(store.merchant_id, "m-1");
        assert_eq!(store.widget_config.position, WidgetPosition::BottomRight);
        assert_eq!(
            store.widget_config.custom_message.as_deref(),
            Some("Help us offset carbon emissions!")
        );
    }

    #[test]
    fn partial_updates_skip_absent_fields() {
        let update = MerchantUpdate {
            company: Some("Ecocart".into()),
            ..MerchantUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "company": "Ecocart" })
        );
    }

    #[test]
    fn summary_tolerates_missing_daily() {
        let summary: MonthlySummaryResponse = serde_json::from_value(json!({
            "store": "unknown.myshopify.com",
            "month": "2024-01",
            "currency": "USD",
            "totals": { "opt_ins": 0, "estimated_offset": 0 }
        }))
        .unwrap();
        assert!(summary.daily.is_empty());
        assert_eq!(summary.totals, SummaryTotals::default());
    }
}
