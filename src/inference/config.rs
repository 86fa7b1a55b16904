//! Predictor configuration

use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for cost prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Multiplier from model units to the display currency
    pub currency_rate: f64,

    /// Symbol prefixed to formatted amounts
    pub currency_symbol: String,

    /// Number of contributions surfaced for the chart
    pub top_k: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            currency_rate: 1.0,
            currency_symbol: "$".to_string(),
            top_k: 8,
        }
    }
}

impl PredictorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency_rate(mut self, rate: f64) -> Self {
        self.currency_rate = rate;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.currency_rate.is_finite() || self.currency_rate <= 0.0 {
            return Err(CostError::InvalidParameter {
                name: "currency_rate".to_string(),
                value: self.currency_rate.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }
}

/// Format an amount with a symbol, thousands separators and two decimals
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.currency_rate, 1.0);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.top_k, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        assert!(PredictorConfig::new().with_currency_rate(0.0).validate().is_err());
        assert!(PredictorConfig::new().with_currency_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(999.999, "$"), "$1,000.00");
        assert_eq!(format_currency(1234567.891, "$"), "$1,234,567.89");
        assert_eq!(format_currency(-4500.5, "€"), "-€4,500.50");
        assert_eq!(format_currency(123.0, ""), "123.00");
    }
}
