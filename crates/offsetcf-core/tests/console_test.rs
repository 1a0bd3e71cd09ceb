#![allow(clippy::unwrap_used)]
// Integration tests for `Console` and `ReportingView` against wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use offsetcf_api::ApiClient;
use offsetcf_core::{
    ApplyOutcome, Console, ConsoleConfig, CoreError, MerchantForm, Month, OptInFilters,
    ReportState, StoreForm, StorePatch, SummarySource, Totals,
};

const STORE: &str = "ecocart-widget.myshopify.com";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let api = ApiClient::with_client(reqwest::Client::new(), base_url.clone()).unwrap();
    let console = Console::with_client(ConsoleConfig::for_url(base_url), api);
    (server, console)
}

fn jan() -> Month {
    "2024-01".parse().unwrap()
}

fn jan_summary() -> serde_json::Value {
    json!({
        "store": STORE,
        "month": "2024-01",
        "currency": "USD",
        "totals": { "opt_ins": 3, "estimated_offset": 1.50 },
        "daily": [
            { "day": "2024-01-01", "opt_ins": 1, "estimated_offset": 0.50 },
            { "day": "2024-01-02", "opt_ins": 0, "estimated_offset": 0.00 },
            { "day": "2024-01-03", "opt_ins": 2, "estimated_offset": 1.00 }
        ]
    })
}

fn store_json(id: &str, enabled: bool) -> serde_json::Value {
    json!({
        "id": id,
        "merchantId": "m-1",
        "name": "My E-commerce Store",
        "domain": "mystore.com",
        "widgetConfig": {
            "position": "bottom-right",
            "theme": "auto",
            "primaryColor": "#10b981",
            "textColor": "#ffffff",
            "enabled": enabled,
            "customMessage": "Help us offset carbon emissions!"
        },
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

async fn mount_jan(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary")))
        .and(query_param("month", "2024-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jan_summary()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary/export")))
        .and(query_param("month", "2024-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string(
                    "day,opt_ins,estimated_offset\n\
                     2024-01-01,1,0.50\n\
                     2024-01-02,0,0.00\n\
                     2024-01-03,2,1.00\n",
                ),
        )
        .mount(server)
        .await;
}

// ── Opt-in summary ──────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_store_never_reaches_network() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let all = OptInFilters::new("all", jan());
    assert!(matches!(
        console.monthly_summary(&all).await,
        Err(CoreError::MissingStoreId)
    ));
    assert!(matches!(
        console.export(&OptInFilters::default()).await,
        Err(CoreError::MissingStoreId)
    ));
}

#[tokio::test]
async fn test_view_loads_example_month() {
    let (server, console) = setup().await;
    mount_jan(&server).await;

    let view = console.reporting_view(OptInFilters::default());
    let outcome = view.set_filters(OptInFilters::new(STORE, jan())).await;
    assert_eq!(outcome, ApplyOutcome::Applied);

    let totals = view.totals();
    assert_eq!(totals.opt_ins, 3);
    assert!((totals.estimated_offset - 1.5).abs() < 1e-9);
    assert_eq!(view.currency(), "USD");

    let daily = view.daily();
    assert_eq!(daily.len(), 31);
    assert_eq!(daily[0].opt_ins, 1);
    assert_eq!(daily[2].opt_ins, 2);
    assert!(daily[3..].iter().all(|d| d.opt_ins == 0));
}

#[tokio::test]
async fn test_export_matches_loaded_report() {
    let (server, console) = setup().await;
    mount_jan(&server).await;

    let view = console.reporting_view(OptInFilters::new(STORE, jan()));
    assert_eq!(view.reapply().await, ApplyOutcome::Applied);

    let export = view.export().await.unwrap();
    assert_eq!(export.filename, "opt-ins-2024-01.csv");
    assert!(export.totals().unwrap().approx_eq(&view.totals()));
    assert!(view.report().unwrap().matches_export(&export).unwrap());
}

#[tokio::test]
async fn test_summary_404_is_empty_month() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/merchant/new-store.myshopify.com/monthly-summary"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no data" })))
        .mount(&server)
        .await;

    let summary = console
        .monthly_summary(&OptInFilters::new("new-store.myshopify.com", jan()))
        .await
        .unwrap();
    assert_eq!(summary.totals, Totals::ZERO);
    assert_eq!(summary.daily.len(), 31);
    assert_eq!(summary.currency, "USD");
}

#[tokio::test]
async fn test_export_404_is_not_found() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = console
        .export(&OptInFilters::new(STORE, jan()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_inconsistent_totals_become_error_state() {
    let (server, console) = setup().await;

    let mut body = jan_summary();
    body["totals"]["opt_ins"] = json!(4);
    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let view = console.reporting_view(OptInFilters::new(STORE, jan()));
    assert_eq!(view.reapply().await, ApplyOutcome::Failed);
    assert!(matches!(view.state(), ReportState::Error { .. }));
    assert_eq!(view.totals(), Totals::ZERO);
    assert!(matches!(view.export().await, Err(CoreError::NoReportLoaded)));
}

#[tokio::test]
async fn test_summary_for_other_store_is_rejected() {
    let (server, console) = setup().await;

    let mut body = jan_summary();
    body["store"] = json!("other-shop.myshopify.com");
    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = console
        .monthly_summary(&OptInFilters::new(STORE, jan()))
        .await
        .unwrap_err();
    match err {
        CoreError::InvalidSummary { reason } => {
            assert!(reason.contains("other-shop.myshopify.com"), "{reason}");
        }
        other => panic!("expected invalid summary, got {other:?}"),
    }

    let view = console.reporting_view(OptInFilters::new(STORE, jan()));
    assert_eq!(view.reapply().await, ApplyOutcome::Failed);
    assert_eq!(view.totals(), Totals::ZERO);
}

#[tokio::test]
async fn test_failed_refresh_clears_loaded_report() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary")))
        .and(query_param("month", "2024-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jan_summary()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "database down" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/merchant/{STORE}/monthly-summary/export")))
        .respond_with(ResponseTemplate::new(200).set_body_string("day,opt_ins,estimated_offset\n"))
        .expect(0)
        .mount(&server)
        .await;

    let view = console.reporting_view(OptInFilters::default());
    assert_eq!(
        view.set_filters(OptInFilters::new(STORE, jan())).await,
        ApplyOutcome::Applied
    );
    assert_eq!(view.totals().opt_ins, 3);

    assert_eq!(view.reapply().await, ApplyOutcome::Failed);
    assert!(matches!(view.state(), ReportState::Error { .. }));
    assert_eq!(view.totals(), Totals::ZERO);
    assert!(view.daily().is_empty());
    assert!(view.report().is_none());
    assert!(matches!(view.export().await, Err(CoreError::NoReportLoaded)));
}

#[tokio::test]
async fn test_server_error_becomes_error_state() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "database down" })))
        .mount(&server)
        .await;

    let view = console.reporting_view(OptInFilters::new(STORE, jan()));
    assert_eq!(view.reapply().await, ApplyOutcome::Failed);
    match view.state() {
        ReportState::Error { message, .. } => assert!(message.contains("database down"), "{message}"),
        other => panic!("expected error state, got {other:?}"),
    }
}

// ── Merchants & stores ──────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_merchant_form_sends_nothing() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = console
        .register_merchant(MerchantForm {
            name: "J".into(),
            email: "jane".into(),
            company: "Ecocart".into(),
            website: None,
        })
        .await
        .unwrap_err();

    match err {
        CoreError::Validation(errors) => {
            assert_eq!(errors.fields().len(), 2);
            assert!(errors.get("email").is_some());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_store_sends_widget_defaults() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/stores"))
        .and(body_json(json!({
            "merchantId": "m-1",
            "name": "My E-commerce Store",
            "domain": "mystore.com",
            "widgetConfig": {
                "position": "bottom-right",
                "theme": "auto",
                "primaryColor": "#10b981",
                "textColor": "#ffffff",
                "enabled": true
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(store_json("s-1", true)))
        .expect(1)
        .mount(&server)
        .await;

    let store = console
        .create_store(
            "m-1",
            StoreForm {
                name: "My E-commerce Store".into(),
                domain: "mystore.com".into(),
                ..StoreForm::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(store.id, "s-1");
}

#[tokio::test]
async fn test_disable_widget_keeps_other_settings() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/merchants/m-1/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([store_json("s-1", true)])))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/stores/s-1"))
        .and(body_json(json!({
            "widgetConfig": {
                "position": "bottom-right",
                "theme": "auto",
                "primaryColor": "#10b981",
                "textColor": "#ffffff",
                "enabled": false,
                "customMessage": "Help us offset carbon emissions!"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(store_json("s-1", false)))
        .expect(1)
        .mount(&server)
        .await;

    let store = console.set_widget_enabled("m-1", "s-1", false).await.unwrap();
    assert!(!store.widget_config.enabled);
}

#[tokio::test]
async fn test_update_unknown_store_is_not_found() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/merchants/m-1/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([store_json("s-1", true)])))
        .mount(&server)
        .await;

    let err = console
        .update_store(
            "m-1",
            "s-9",
            StorePatch {
                name: Some("Renamed".into()),
                ..StorePatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { ref identifier, .. } if identifier == "s-9"));
}

#[tokio::test]
async fn test_bad_store_patch_is_rejected_before_lookup() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = console
        .update_store(
            "m-1",
            "s-1",
            StorePatch {
                primary_color: Some("green".into()),
                ..StorePatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_precondition());
}

#[tokio::test]
async fn test_get_missing_merchant_is_not_found() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/merchants/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = console.get_merchant("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "Entity not found: merchant with id ghost");
}
