use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::{cmp::Ordering, fmt, path::PathBuf};
use thiserror::Error;

/// Columns every order file must carry, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "order_id",
    "customer_id",
    "order_date",
    "product_id",
    "product_name",
    "product_price",
    "quantity",
];

/// The only format accepted for `order_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Customer identifier as read from the file. Ordering is "natural": two purely
/// numeric ids compare as numbers (so `9 < 10`), numeric ids sort before any
/// other id, and everything else compares as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl Ord for CustomerId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl CustomerId {
    /// Only plain ASCII digits count as a number; signs and spaces make it text.
    fn as_number(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl PartialOrd for CustomerId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar month, only ever used as a grouping key. Field order gives the
/// chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An order that went through validation. `revenue` and `month` are derived
/// once in the preprocessor and never touched afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct EnrichedOrder {
    pub order_id: String,
    pub customer_id: CustomerId,
    pub order_date: NaiveDate,
    pub product_id: String,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i64,
    pub revenue: Decimal,
    pub month: Month,
}

/// Everything that can go wrong between opening the file and handing enriched
/// orders to the aggregations. Each stage raises its own kind; the binary
/// reports them all the same way.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("The file {} was not found.", .0.display())]
    NotFound(PathBuf),
    #[error("The file is empty.")]
    Empty,
    #[error("The file could not be parsed: {0}")]
    Parse(String),
    #[error("Missing columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Error converting 'order_date' to datetime (rows {})", join_rows(.rows))]
    DateParse { rows: Vec<usize> },
    #[error("Invalid value in row {row}: {message}")]
    InvalidValue { row: usize, message: String },
    #[error("Revenue too large to compute in row {row}")]
    Overflow { row: usize },
    #[error("Unexpected failure while reading orders: {0}")]
    Unexpected(String),
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
