use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
    Refunded,
}

impl InvoiceStatus {
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Refunded => "refunded",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingParty {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Taken as given; never recomputed from quantity and unit price.
    pub total_price: Decimal,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(alias = "paymentMethod", alias = "gateway")]
    pub method: String,
    pub status: String,
    pub amount: Decimal,
}

/// A fully resolved invoice as handed over by the billing service.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSnapshot {
    pub invoice_number: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub owner: BillingParty,
    pub subtotal: Decimal,
    pub tax_percentage: Decimal,
    pub tax_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
}

impl InvoiceSnapshot {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the structural invariants the renderer relies on. Business rules
    /// (tax rates, whether totals add up) are the billing service's concern.
    pub fn validate(&self) -> Result<(), Error> {
        if self.invoice_number.trim().is_empty() {
            return Err(Error::MissingInvoiceNumber);
        }
        if self.line_items.is_empty() {
            return Err(Error::NoLineItems);
        }

        let amounts = [
            ("subtotal", self.subtotal),
            ("tax percentage", self.tax_percentage),
            ("tax amount", self.tax_amount),
            ("discount amount", self.discount_amount),
            ("total amount", self.total_amount),
        ];
        for (field, value) in amounts {
            non_negative(field.to_string(), value)?;
        }

        for (i, item) in self.line_items.iter().enumerate() {
            let line = i + 1;
            if item.quantity == 0 {
                return Err(Error::ZeroQuantity { line });
            }
            non_negative(format!("line {line} unit price"), item.unit_price)?;
            non_negative(format!("line {line} total price"), item.total_price)?;
        }
        for (i, payment) in self.payments.iter().enumerate() {
            non_negative(format!("payment {} amount", i + 1), payment.amount)?;
        }
        Ok(())
    }

    pub fn has_cross_references(&self) -> bool {
        present(&self.booking_id).is_some() || present(&self.subscription_id).is_some()
    }
}

fn non_negative(field: String, value: Decimal) -> Result<(), Error> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::NegativeAmount { field, value });
    }
    Ok(())
}

/// Optional free text counts as absent when it is blank.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
