/// How a scalar is printed on a summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueFormat {
    /// Two decimals, symbol prefix: `$1234.50`.
    Currency { symbol: String },
    /// Whole numbers, halves rounded away from zero, suffix: `118 units`.
    Units { suffix: String },
    /// Two decimals, `%` suffix. Values are already in percent.
    Percent,
}

impl ValueFormat {
    pub fn dollars() -> Self {
        Self::Currency {
            symbol: "$".to_string(),
        }
    }

    pub fn units() -> Self {
        Self::Units {
            suffix: "units".to_string(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Currency { symbol } => format!("{}{:.2}", symbol, value),
            Self::Units { suffix } => format!("{:.0} {}", value.round(), suffix),
            Self::Percent => format!("{:.2}%", value),
        }
    }

    /// `$90.00 - $110.00`, `80 - 120 units`, `1.00% - 2.00%`.
    pub fn format_range(&self, lower: f64, upper: f64) -> String {
        match self {
            Self::Currency { symbol } => format!("{}{:.2} - {}{:.2}", symbol, lower, symbol, upper),
            Self::Units { suffix } => {
                format!("{:.0} - {:.0} {}", lower.round(), upper.round(), suffix)
            }
            Self::Percent => format!("{:.2}% - {:.2}%", lower, upper),
        }
    }
}
