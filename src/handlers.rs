use crate::cart::{parse_price, DEFAULT_PRODUCT_IMAGE, DEFAULT_PRODUCT_NAME};
use crate::donation::thank_you_notice;
use crate::errors::AppError;
use crate::models::{
    AddToCartRequest, CartResponse, CountersResponse, DonationResponse, PayNowRequest,
    SelectPresetRequest, SessionResponse,
};
use crate::state::{AppState, EcoState};
use crate::ui::{render_cart_items, render_index, render_login};
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use tracing::info;

pub const LANDING_PAGE: &str = "/";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&data))
}

pub async fn login_page() -> Html<String> {
    Html(render_login())
}

pub async fn log_in(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let mut data = state.data.lock().await;
    state.commit(&mut data, |draft| draft.log_in()).await?;
    info!("visitor logged in");

    Ok(Json(SessionResponse {
        logged_in: true,
        redirect: Some(LANDING_PAGE.to_string()),
    }))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let data = state.data.lock().await;
    Json(SessionResponse {
        logged_in: data.logged_in(),
        redirect: None,
    })
}

pub async fn get_counters(State(state): State<AppState>) -> Json<CountersResponse> {
    let data = state.data.lock().await;
    Json(CountersResponse {
        co2: data.climate.co2_display(),
        temperature: data.climate.temperature_display(),
        trees: data.trees.display(),
        co2_ppm: data.climate.co2.current,
        temperature_anomaly: data.climate.temperature.current,
        trees_lost: data.trees.trees_lost.floor() as u64,
    })
}

pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    let data = state.data.lock().await;
    Json(cart_response(&data, None))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let name = non_blank(payload.name).unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());
    let price = parse_price(payload.price.as_deref().unwrap_or_default());
    let image = non_blank(payload.image).unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string());

    let mut data = state.data.lock().await;
    let notice = state
        .commit(&mut data, |draft| draft.add_to_cart(&name, price, &image))
        .await?;
    info!("added {name} at {price:.2} to cart");

    Ok(Json(cart_response(&data, Some(notice))))
}

/// Out-of-range or unreadable indices answer with the unchanged cart.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> Result<Json<CartResponse>, AppError> {
    let mut data = state.data.lock().await;
    if let Ok(index) = index.trim().parse::<usize>() {
        if state.commit(&mut data, |draft| draft.remove_at(index)).await? {
            info!("removed cart line {index}");
        }
    }

    Ok(Json(cart_response(&data, None)))
}

pub async fn get_donations(State(state): State<AppState>) -> Json<DonationResponse> {
    let data = state.data.lock().await;
    Json(donation_response(&data, None))
}

pub async fn select_preset(
    State(state): State<AppState>,
    Json(payload): Json<SelectPresetRequest>,
) -> Result<Json<DonationResponse>, AppError> {
    let mut data = state.data.lock().await;
    data.select_preset(payload.amount)?;
    Ok(Json(donation_response(&data, None)))
}

pub async fn pay_now(
    State(state): State<AppState>,
    Json(payload): Json<PayNowRequest>,
) -> Result<Json<DonationResponse>, AppError> {
    let mut data = state.data.lock().await;
    let amount = state
        .commit(&mut data, |draft| draft.pay_now(payload.custom_amount))
        .await?;
    info!("recorded donation of {amount}");

    Ok(Json(donation_response(&data, Some(thank_you_notice(amount)))))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cart_response(data: &EcoState, notice: Option<String>) -> CartResponse {
    CartResponse {
        items: data.cart.items().to_vec(),
        item_count: data.cart.item_count(),
        total: data.cart.total_display(),
        items_html: render_cart_items(&data.cart),
        notice,
    }
}

fn donation_response(data: &EcoState, notice: Option<String>) -> DonationResponse {
    DonationResponse {
        ledger: data.donations.clone(),
        selected_preset: data.selected_preset,
        chart_generation: data.chart.generation,
        chart: data.chart.spec.clone(),
        notice,
    }
}
