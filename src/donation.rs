//! Fake donation ledger and the pie chart it feeds.

use crate::errors::DonationError;
use serde::{Deserialize, Serialize};

pub const PRESET_AMOUNTS: [f64; 4] = [10.0, 25.0, 50.0, 100.0];

/// Share of each donation per category, in percent.
pub const SHARES: [f64; 5] = [35.0, 25.0, 20.0, 10.0, 10.0];
pub const CHART_COLORS: [&str; 5] = ["#1b5e20", "#2e7d32", "#66bb6a", "#a5d6a7", "#c8e6c9"];
const CATEGORY_LABELS: [&str; 5] = [
    "Reforestation (35%)",
    "Methane Reduction (25%)",
    "Renewable Energy (20%)",
    "Climate Education (10%)",
    "Operations (10%)",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationLedger {
    pub reforestation: f64,
    pub methane: f64,
    pub renewables: f64,
    pub education: f64,
    pub operations: f64,
    pub total_donated: f64,
}

impl DonationLedger {
    fn categories(&self) -> [f64; 5] {
        [
            self.reforestation,
            self.methane,
            self.renewables,
            self.education,
            self.operations,
        ]
    }

    /// Splits `amount` across all five categories in one step.
    pub fn process_donation(&mut self, amount: Option<f64>) -> Result<f64, DonationError> {
        let amount = amount
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or(DonationError::InvalidAmount)?;

        self.reforestation += amount * 0.35;
        self.methane += amount * 0.25;
        self.renewables += amount * 0.20;
        self.education += amount * 0.10;
        self.operations += amount * 0.10;
        self.total_donated += amount;
        Ok(amount)
    }

    pub fn chart_spec(&self) -> PieChartSpec {
        let labels = CATEGORY_LABELS
            .iter()
            .zip(self.categories())
            .map(|(label, raised)| format!("{label} – ${}k", (raised / 1000.0).round()))
            .collect();

        PieChartSpec {
            labels,
            values: SHARES.to_vec(),
            colors: CHART_COLORS.iter().map(|color| color.to_string()).collect(),
            title: format!(
                "Total Raised So Far: ${:.1}k — Thank You!",
                self.total_donated / 1000.0
            ),
            total_raised: self.total_donated,
        }
    }
}

/// What the chart renderer needs to draw one pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub title: String,
    pub total_raised: f64,
}

/// The currently drawn chart. Each redraw replaces the previous instance
/// wholesale; the generation tells the page to destroy its old chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DonationChart {
    pub generation: u64,
    pub spec: Option<PieChartSpec>,
}

impl DonationChart {
    pub fn redraw(&mut self, ledger: &DonationLedger) -> &PieChartSpec {
        self.generation += 1;
        self.spec.insert(ledger.chart_spec())
    }
}

/// A typed amount wins when it is a positive number; otherwise the selected
/// preset is used.
pub fn resolve_amount(custom: Option<f64>, selected_preset: Option<f64>) -> Option<f64> {
    match custom {
        Some(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
        _ => selected_preset,
    }
}

pub fn validate_preset(amount: f64) -> Result<f64, DonationError> {
    if PRESET_AMOUNTS.contains(&amount) {
        Ok(amount)
    } else {
        Err(DonationError::UnknownPreset(amount))
    }
}

pub fn thank_you_notice(amount: f64) -> String {
    format!("You just donated ${amount}! The planet thanks you")
}
