// offsetcf-api: Async Rust client for the OffsetCF merchant REST API

pub mod client;
pub mod error;
pub mod merchants;
pub mod models;
pub mod opt_ins;
pub mod stores;
pub mod transport;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::Error;
pub use models::{
    DailyOptInData, Merchant, MerchantUpdate, MonthlySummaryResponse, NewMerchant, NewStore,
    Store, StoreUpdate, SummaryTotals, WidgetConfig, WidgetPosition, WidgetTheme,
};
pub use transport::TransportConfig;
