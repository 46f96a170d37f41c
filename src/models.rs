use crate::cart::CartItem;
use crate::donation::{DonationLedger, PieChartSpec};
use serde::{Deserialize, Serialize};

/// A "buy" click, carrying whatever the product card had on it.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectPresetRequest {
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PayNowRequest {
    pub custom_amount: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountersResponse {
    pub co2: String,
    pub temperature: String,
    pub trees: String,
    pub co2_ppm: f64,
    pub temperature_anomaly: f64,
    pub trees_lost: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub item_count: u64,
    pub total: String,
    pub items_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DonationResponse {
    pub ledger: DonationLedger,
    pub selected_preset: Option<f64>,
    pub chart_generation: u64,
    pub chart: Option<PieChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub logged_in: bool,
    pub redirect: Option<String>,
}
