use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invoice number is missing")]
    MissingInvoiceNumber,

    #[error("invoice has no line items")]
    NoLineItems,

    #[error("line item {line} has a quantity of zero")]
    ZeroQuantity { line: usize },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("invalid invoice JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
