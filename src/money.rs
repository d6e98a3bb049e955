//! Currency formatting strategies.
//!
//! Amounts arrive as exact decimals and are rounded half away from zero to the
//! currency's minor unit. Nothing here ever truncates.

use rust_decimal::{Decimal, RoundingStrategy};

pub trait MoneyFormat: Send + Sync {
    fn format(&self, amount: Decimal) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grouping {
    /// Lakh/crore grouping: the last three digits, then pairs (12,34,567).
    Indian,
    /// Groups of three (1,234,567).
    Western,
}

#[derive(Clone, Debug)]
pub struct GroupedCurrency {
    pub symbol: String,
    pub symbol_after: bool,
    pub grouping: Grouping,
    pub group_separator: char,
    pub decimal_separator: char,
    pub decimals: u32,
}

impl GroupedCurrency {
    /// Indian rupees in en-IN grouping. The rupee sign has no WinAnsi code
    /// point, so the standard fonts get the "Rs." abbreviation.
    pub fn inr() -> Self {
        Self {
            symbol: "Rs. ".to_string(),
            symbol_after: false,
            grouping: Grouping::Indian,
            group_separator: ',',
            decimal_separator: '.',
            decimals: 2,
        }
    }

    pub fn usd() -> Self {
        Self {
            symbol: "$".to_string(),
            symbol_after: false,
            grouping: Grouping::Western,
            group_separator: ',',
            decimal_separator: '.',
            decimals: 2,
        }
    }

    pub fn gbp() -> Self {
        Self {
            symbol: "\u{00A3}".to_string(),
            ..Self::usd()
        }
    }

    pub fn eur_de() -> Self {
        Self {
            symbol: " \u{20AC}".to_string(),
            symbol_after: true,
            grouping: Grouping::Western,
            group_separator: '.',
            decimal_separator: ',',
            decimals: 2,
        }
    }

    pub fn for_locale(locale: &str) -> Option<Self> {
        match locale {
            "en-IN" | "hi-IN" => Some(Self::inr()),
            "en-US" => Some(Self::usd()),
            "en-GB" => Some(Self::gbp()),
            "de-DE" => Some(Self::eur_de()),
            _ => None,
        }
    }
}

impl Default for GroupedCurrency {
    fn default() -> Self {
        Self::inr()
    }
}

impl MoneyFormat for GroupedCurrency {
    fn format(&self, amount: Decimal) -> String {
        let mut rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.decimals);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits.as_str(), ""),
        };

        let mut number = group_digits(int_part, self.grouping, self.group_separator);
        if !frac_part.is_empty() {
            number.push(self.decimal_separator);
            number.push_str(frac_part);
        }

        let sign = if negative { "-" } else { "" };
        if self.symbol_after {
            format!("{sign}{number}{}", self.symbol)
        } else {
            format!("{sign}{}{number}", self.symbol)
        }
    }
}

fn group_digits(int_part: &str, grouping: Grouping, separator: char) -> String {
    let len = int_part.len();
    if len <= 3 {
        return int_part.to_string();
    }

    let (head, tail) = int_part.split_at(len - 3);
    let head_group = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(head_group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);

    let mut out = String::with_capacity(len + groups.len());
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(group);
    }
    out
}

/// Tax percentages are printed without trailing zeros: 18.00 -> "18", 12.50 -> "12.5".
pub fn format_percentage(value: Decimal) -> String {
    value.normalize().to_string()
}
