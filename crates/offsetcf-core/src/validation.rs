// ── Form validation ──
//
// Merchant and store input is checked here before any request is built.
// Every field is checked so callers can show all problems at once.

use std::fmt;

use url::Url;

use offsetcf_api::{
    MerchantUpdate, NewMerchant, NewStore, Store, StoreUpdate, WidgetConfig, WidgetPosition,
    WidgetTheme,
};

pub const DEFAULT_PRIMARY_COLOR: &str = "#10b981";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

// ── Errors ──────────────────────────────────────────────────────────

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors from one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for one field, if it was rejected.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn check(&mut self, field: &'static str, ok: bool, message: &str) {
        if !ok {
            self.0.push(FieldError {
                field,
                message: message.to_owned(),
            });
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

// ── Field rules ─────────────────────────────────────────────────────

fn min_chars(value: &str, n: usize) -> bool {
    value.trim().chars().count() >= n
}

/// Syntactic check only: `local@domain.tld`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Absolute `http`/`https` URL with a host.
pub fn is_valid_website(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// `#RRGGBB`, case-insensitive.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value.bytes().skip(1).all(|b| b.is_ascii_hexdigit())
}

/// Blank optional text is treated as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── Merchant forms ──────────────────────────────────────────────────

/// Input for merchant registration.
#[derive(Debug, Clone, Default)]
pub struct MerchantForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub website: Option<String>,
}

impl MerchantForm {
    pub fn validate(self) -> Result<NewMerchant, ValidationErrors> {
        let website = non_blank(self.website);
        let mut c = Collector::default();
        c.check("name", min_chars(&self.name, 2), "Name must be at least 2 characters");
        c.check(
            "email",
            is_valid_email(self.email.trim()),
            "Please enter a valid email address",
        );
        c.check(
            "company",
            min_chars(&self.company, 2),
            "Company name must be at least 2 characters",
        );
        c.check(
            "website",
            website.as_deref().is_none_or(is_valid_website),
            "Please enter a valid URL",
        );
        c.finish(NewMerchant {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            company: self.company.trim().to_owned(),
            website,
        })
    }
}

/// Partial merchant edit; only present fields are validated and sent.
#[derive(Debug, Clone, Default)]
pub struct MerchantPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
}

impl MerchantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.company.is_none() && self.website.is_none()
    }

    pub fn validate(self) -> Result<MerchantUpdate, ValidationErrors> {
        let mut c = Collector::default();
        if let Some(name) = &self.name {
            c.check("name", min_chars(name, 2), "Name must be at least 2 characters");
        }
        if let Some(email) = &self.email {
            c.check(
                "email",
                is_valid_email(email.trim()),
                "Please enter a valid email address",
            );
        }
        if let Some(company) = &self.company {
            c.check(
                "company",
                min_chars(company, 2),
                "Company name must be at least 2 characters",
            );
        }
        let website = non_blank(self.website);
        c.check(
            "website",
            website.as_deref().is_none_or(is_valid_website),
            "Please enter a valid URL",
        );
        c.finish(MerchantUpdate {
            name: self.name.map(|v| v.trim().to_owned()),
            email: self.email.map(|v| v.trim().to_owned()),
            company: self.company.map(|v| v.trim().to_owned()),
            website,
        })
    }
}

// ── Store forms ─────────────────────────────────────────────────────

/// Input for adding a store, pre-filled with the widget defaults.
#[derive(Debug, Clone)]
pub struct StoreForm {
    pub name: String,
    pub domain: String,
    pub position: WidgetPosition,
    pub theme: WidgetTheme,
    pub primary_color: String,
    pub text_color: String,
    pub custom_message: Option<String>,
}

impl Default for StoreForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            domain: String::new(),
            position: WidgetPosition::BottomRight,
            theme: WidgetTheme::Auto,
            primary_color: DEFAULT_PRIMARY_COLOR.into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            custom_message: None,
        }
    }
}

impl StoreForm {
    /// New stores start with the widget enabled.
    pub fn validate(self, merchant_id: &str) -> Result<NewStore, ValidationErrors> {
        let mut c = Collector::default();
        c.check(
            "name",
            min_chars(&self.name, 2),
            "Store name must be at least 2 characters",
        );
        c.check("domain", min_chars(&self.domain, 1), "Domain is required");
        check_colors(&mut c, Some(&self.primary_color), Some(&self.text_color));
        c.finish(NewStore {
            merchant_id: merchant_id.to_owned(),
            name: self.name.trim().to_owned(),
            domain: self.domain.trim().to_owned(),
            widget_config: WidgetConfig {
                position: self.position,
                theme: self.theme,
                primary_color: self.primary_color,
                text_color: self.text_color,
                enabled: true,
                custom_message: non_blank(self.custom_message),
            },
        })
    }
}

/// Partial store edit, merged onto the store's current widget config.
#[derive(Debug, Clone, Default)]
pub struct StorePatch {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub position: Option<WidgetPosition>,
    pub theme: Option<WidgetTheme>,
    pub primary_color: Option<String>,
    pub text_color: Option<String>,
    pub enabled: Option<bool>,
    /// `Some("")` clears the message.
    pub custom_message: Option<String>,
}

impl StorePatch {
    fn touches_widget(&self) -> bool {
        self.position.is_some()
            || self.theme.is_some()
            || self.primary_color.is_some()
            || self.text_color.is_some()
            || self.enabled.is_some()
            || self.custom_message.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.domain.is_none() && !self.touches_widget()
    }

    /// Check the present fields without needing the current store.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.collect().finish(())
    }

    fn collect(&self) -> Collector {
        let mut c = Collector::default();
        if let Some(name) = &self.name {
            c.check("name", min_chars(name, 2), "Store name must be at least 2 characters");
        }
        if let Some(domain) = &self.domain {
            c.check("domain", min_chars(domain, 1), "Domain is required");
        }
        check_colors(
            &mut c,
            self.primary_color.as_deref(),
            self.text_color.as_deref(),
        );
        c
    }

    /// Validate and build the update body against `current`.
    ///
    /// The widget config is sent whole because the backend replaces it.
    pub fn apply(self, current: &Store) -> Result<StoreUpdate, ValidationErrors> {
        let c = self.collect();
        let widget_config = self.touches_widget().then(|| {
            let base = &current.widget_config;
            WidgetConfig {
                position: self.position.unwrap_or(base.position),
                theme: self.theme.unwrap_or(base.theme),
                primary_color: self
                    .primary_color
                    .clone()
                    .unwrap_or_else(|| base.primary_color.clone()),
                text_color: self
                    .text_color
                    .clone()
                    .unwrap_or_else(|| base.text_color.clone()),
                enabled: self.enabled.unwrap_or(base.enabled),
                custom_message: match self.custom_message.clone() {
                    Some(msg) => non_blank(Some(msg)),
                    None => base.custom_message.clone(),
                },
            }
        });

        c.finish(StoreUpdate {
            name: self.name.map(|v| v.trim().to_owned()),
            domain: self.domain.map(|v| v.trim().to_owned()),
            widget_config,
        })
    }
}

fn check_colors(c: &mut Collector, primary: Option<&str>, text: Option<&str>) {
    if let Some(primary) = primary {
        c.check("primaryColor", is_hex_color(primary), "Please enter a valid hex color");
    }
    if let Some(text) = text {
        c.check("textColor", is_hex_color(text), "Please enter a valid hex color");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn merchant_form() -> MerchantForm {
        MerchantForm {
            name: "Jane Doe".into(),
            email: "jane@ecocart.io".into(),
            company: "Ecocart".into(),
            website: None,
        }
    }

    fn store() -> Store {
        Store {
            id: "s-1".into(),
            merchant_id: "m-1".into(),
            name: "My E-commerce Store".into(),
            domain: "mystore.com".into(),
            widget_config: WidgetConfig {
                position: WidgetPosition::BottomRight,
                theme: WidgetTheme::Auto,
                primary_color: "#10b981".into(),
                text_color: "#ffffff".into(),
                enabled: true,
                custom_message: Some("Help us offset carbon emissions!".into()),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        for bad in ["", "plain", "@b.co", "a@", "a@b", "a@@b.co", "a b@c.io", "a@b..co"] {
            assert!(!is_valid_email(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn website_and_color_rules() {
        assert!(is_valid_website("https://ecocart.io"));
        assert!(is_valid_website("http://localhost:8080/shop"));
        assert!(!is_valid_website("ecocart.io"));
        assert!(!is_valid_website("ftp://ecocart.io"));

        assert!(is_hex_color("#10B981"));
        assert!(is_hex_color("#ffffff"));
        assert!(!is_hex_color("10b981"));
        assert!(!is_hex_color("#fff"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn merchant_form_blank_website_is_absent() {
        let mut form = merchant_form();
        form.website = Some("   ".into());
        let merchant = form.validate().unwrap();
        assert_eq!(merchant.website, None);
    }

    #[test]
    fn merchant_form_reports_every_field() {
        let errors = MerchantForm {
            name: "J".into(),
            email: "not-an-email".into(),
            company: String::new(),
            website: Some("nope".into()),
        }
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.fields().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "company", "website"]);
        assert_eq!(
            errors.get("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn merchant_patch_only_checks_present_fields() {
        let update = MerchantPatch {
            company: Some("Ecocart Inc".into()),
            ..MerchantPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(update.company.as_deref(), Some("Ecocart Inc"));
        assert_eq!(update.name, None);

        let bad = MerchantPatch {
            email: Some("x".into()),
            ..MerchantPatch::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn store_form_applies_defaults() {
        let new_store = StoreForm {
            name: "Teatotaler".into(),
            domain: "teatotaler.myshopify.com".into(),
            custom_message: Some(String::new()),
            ..StoreForm::default()
        }
        .validate("m-1")
        .unwrap();

        assert_eq!(new_store.merchant_id, "m-1");
        assert_eq!(new_store.widget_config.position, WidgetPosition::BottomRight);
        assert_eq!(new_store.widget_config.theme, WidgetTheme::Auto);
        assert_eq!(new_store.widget_config.primary_color, DEFAULT_PRIMARY_COLOR);
        assert!(new_store.widget_config.enabled);
        assert_eq!(new_store.widget_config.custom_message, None);
    }

    #[test]
    fn store_form_rejects_bad_colors_and_domain() {
        let errors = StoreForm {
            name: "Teatotaler".into(),
            domain: " ".into(),
            primary_color: "green".into(),
            ..StoreForm::default()
        }
        .validate("m-1")
        .unwrap_err();
        assert_eq!(errors.get("domain"), Some("Domain is required"));
        assert!(errors.get("primaryColor").is_some());
        assert!(errors.get("textColor").is_none());
    }

    #[test]
    fn store_patch_merges_widget_config() {
        let update = StorePatch {
            enabled: Some(false),
            theme: Some(WidgetTheme::Dark),
            ..StorePatch::default()
        }
        .apply(&store())
        .unwrap();

        let widget = update.widget_config.unwrap();
        assert!(!widget.enabled);
        assert_eq!(widget.theme, WidgetTheme::Dark);
        assert_eq!(widget.primary_color, "#10b981");
        assert_eq!(
            widget.custom_message.as_deref(),
            Some("Help us offset carbon emissions!")
        );
        assert_eq!(update.name, None);
    }

    #[test]
    fn store_patch_without_widget_fields_leaves_config_out() {
        let update = StorePatch {
            name: Some("Renamed".into()),
            ..StorePatch::default()
        }
        .apply(&store())
        .unwrap();
        assert_eq!(update.widget_config, None);
    }

    #[test]
    fn store_patch_can_clear_message() {
        let update = StorePatch {
            custom_message: Some(String::new()),
            ..StorePatch::default()
        }
        .apply(&store())
        .unwrap();
        assert_eq!(update.widget_config.unwrap().custom_message, None);
    }
}
