use crate::cart::Cart;
use crate::climate::ClimateSample;
use crate::donation::{resolve_amount, validate_preset, DonationChart, DonationLedger};
use crate::errors::{AppError, DonationError};
use crate::storage::{persist_store, LocalStore, CART_KEY, DONATIONS_KEY, LOGGED_IN_KEY};
use crate::ticker::Tick;
use crate::trees::TreeLossState;
use chrono::{DateTime, Local, TimeZone};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::Mutex;

/// Everything the page shows. Ledger operations update the in-memory value
/// and its store entry together; callers then write the store to disk.
#[derive(Debug, Clone)]
pub struct EcoState {
    pub store: LocalStore,
    pub climate: ClimateSample,
    pub trees: TreeLossState,
    pub cart: Cart,
    pub donations: DonationLedger,
    pub selected_preset: Option<f64>,
    pub chart: DonationChart,
}

impl EcoState {
    pub fn load(store: LocalStore) -> Self {
        Self::load_at(store, &Local::now())
    }

    pub fn load_at<Tz: TimeZone>(store: LocalStore, now: &DateTime<Tz>) -> Self {
        let cart: Cart = store.get(CART_KEY).unwrap_or_default();
        let donations: DonationLedger = store.get(DONATIONS_KEY).unwrap_or_default();
        let mut chart = DonationChart::default();
        chart.redraw(&donations);

        Self {
            store,
            climate: ClimateSample::default(),
            trees: TreeLossState::seeded_at(now),
            cart,
            donations,
            selected_preset: None,
            chart,
        }
    }

    pub fn add_to_cart(&mut self, name: &str, price: f64, image: &str) -> Result<String, AppError> {
        self.cart.add_to_cart(name, price, image);
        self.store.set(CART_KEY, &self.cart)?;
        Ok(format!("{name} added to cart!"))
    }

    /// Returns whether a line was removed.
    pub fn remove_at(&mut self, index: usize) -> Result<bool, AppError> {
        if self.cart.remove_at(index).is_none() {
            return Ok(false);
        }
        self.store.set(CART_KEY, &self.cart)?;
        Ok(true)
    }

    pub fn select_preset(&mut self, amount: f64) -> Result<(), DonationError> {
        self.selected_preset = Some(validate_preset(amount)?);
        Ok(())
    }

    /// Donates the typed amount, or the selected preset when none was typed.
    pub fn pay_now(&mut self, custom: Option<f64>) -> Result<f64, AppError> {
        let amount = resolve_amount(custom, self.selected_preset);
        self.process_donation(amount)
    }

    pub fn process_donation(&mut self, amount: Option<f64>) -> Result<f64, AppError> {
        let mut donations = self.donations.clone();
        let amount = donations.process_donation(amount)?;
        self.store.set(DONATIONS_KEY, &donations)?;
        self.donations = donations;
        self.chart.redraw(&self.donations);
        Ok(amount)
    }

    pub fn log_in(&mut self) -> Result<(), AppError> {
        self.store.set(LOGGED_IN_KEY, &"true")
    }

    pub fn logged_in(&self) -> bool {
        self.store.get::<String>(LOGGED_IN_KEY).as_deref() == Some("true")
    }
}

impl Tick for EcoState {
    fn tick(&mut self, interval: Duration) {
        self.climate.tick(interval);
        self.trees.tick(interval);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<EcoState>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: EcoState) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Runs `op` on a copy of `data` and keeps the result only once the store
    /// file reflects it. A failed write leaves `data` exactly as it was.
    pub async fn commit<T>(
        &self,
        data: &mut EcoState,
        op: impl FnOnce(&mut EcoState) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut draft = data.clone();
        let output = op(&mut draft)?;
        if draft.store != data.store {
            persist_store(&self.data_path, &draft.store).await?;
        }
        *data = draft;
        Ok(output)
    }
}
