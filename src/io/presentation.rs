//! Display rounding.
//!
//! The only place numbers are rounded. Waste, items and masses are shown
//! with two decimals, CO2 in kilotonnes (kg / 1e6) with two decimals,
//! populations as integers and coverage as a percentage. JSON and CSV
//! exports bypass this module and carry full precision.

use crate::estimator::{CountryEstimate, ScenarioSummary};
use crate::pipeline::PipelineReport;

const KG_PER_KILOTONNE: f64 = 1e6;

pub fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn kg_to_kt(kg: f64) -> f64 {
    kg / KG_PER_KILOTONNE
}

/// `0.25` -> `"25%"`, `0.125` -> `"12.5%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", round_dp(fraction * 100.0, 2))
}

/// Insert thousands separators into an already formatted number.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn format_2dp(value: f64) -> String {
    group_thousands(&format!("{value:.2}"))
}

pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// One estimate row as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub rank: usize,
    pub country: String,
    pub code: String,
    pub waste_kg_per_capita: String,
    /// Per-person waste diverted to resale in this scenario
    pub reused_kg_per_capita: String,
    pub population: String,
    pub annual_waste_kg: String,
    pub avoided_waste_kg: String,
    pub avoided_items: String,
    pub avoided_co2_kt: String,
}

impl DisplayRow {
    pub const HEADERS: [&'static str; 10] = [
        "#",
        "Country",
        "ISO3",
        "Waste (kg/person)",
        "Reused (kg/person)",
        "Population",
        "Annual waste (kg)",
        "Avoided waste (kg)",
        "Avoided items",
        "CO2 avoided (kt)",
    ];

    pub fn from_estimate(rank: usize, row: &CountryEstimate) -> Self {
        Self {
            rank,
            country: row.country_display_name.clone(),
            code: row.country_key.to_string(),
            waste_kg_per_capita: format_2dp(row.waste_kg_per_capita),
            reused_kg_per_capita: format_2dp(row.waste_kg_per_capita * row.coverage_fraction),
            population: format_count(row.population),
            annual_waste_kg: format_2dp(row.annual_waste_kg),
            avoided_waste_kg: format_2dp(row.avoided_waste_kg),
            avoided_items: format_2dp(row.avoided_items),
            avoided_co2_kt: format_2dp(kg_to_kt(row.avoided_co2_kg)),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.country.clone(),
            self.code.clone(),
            self.waste_kg_per_capita.clone(),
            self.reused_kg_per_capita.clone(),
            self.population.clone(),
            self.annual_waste_kg.clone(),
            self.avoided_waste_kg.clone(),
            self.avoided_items.clone(),
            self.avoided_co2_kt.clone(),
        ]
    }
}

/// Rows of one scenario plus its totals.
#[derive(Debug, Clone)]
pub struct ScenarioView<'a> {
    pub summary: &'a ScenarioSummary,
    pub rows: Vec<DisplayRow>,
    /// Rows cut by `top`
    pub hidden: usize,
}

impl ScenarioView<'_> {
    pub fn title(&self) -> String {
        format!(
            "Scenario: {} of purchases second-hand",
            format_percent(self.summary.coverage_fraction)
        )
    }

    pub fn totals_line(&self) -> String {
        format!(
            "{} countries: {} kg waste avoided, {} items, {} kt CO2e avoided",
            self.summary.countries,
            format_2dp(self.summary.total_avoided_waste_kg),
            format_2dp(self.summary.total_avoided_items),
            format_2dp(kg_to_kt(self.summary.total_avoided_co2_kg)),
        )
    }
}

/// Group the report's rows by scenario, ranked as the estimator ordered
/// them, keeping at most `top` rows per scenario.
pub fn scenario_views(report: &PipelineReport, top: Option<usize>) -> Vec<ScenarioView<'_>> {
    report
        .summaries
        .iter()
        .map(|summary| {
            let rows: Vec<&CountryEstimate> = report
                .estimates
                .iter()
                .filter(|r| r.coverage_fraction == summary.coverage_fraction)
                .collect();
            let shown = top.unwrap_or(rows.len()).min(rows.len());
            ScenarioView {
                summary,
                rows: rows
                    .iter()
                    .take(shown)
                    .enumerate()
                    .map(|(i, row)| DisplayRow::from_estimate(i + 1, row))
                    .collect(),
                hidden: rows.len() - shown,
            }
        })
        .collect()
}
