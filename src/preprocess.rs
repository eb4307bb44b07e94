use crate::{
    data::{CustomerId, EnrichedOrder, Error, Month, DATE_FORMAT, REQUIRED_COLUMNS},
    read::Table,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

/// What to do with rows whose `order_date` doesn't parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum DatePolicy {
    /// One bad date fails the whole batch.
    #[default]
    Strict,
    /// Bad rows are logged and left out.
    DropInvalid,
}

/// One row of the table, typed. `order_date` is parsed separately, before any
/// row gets here.
#[derive(Debug, Deserialize)]
struct OrderRecord {
    order_id: String,
    customer_id: CustomerId,
    product_id: String,
    product_name: String,
    product_price: Decimal,
    quantity: i64,
}

impl OrderRecord {
    fn enrich(self, order_date: NaiveDate, row: usize) -> Result<EnrichedOrder, Error> {
        let revenue = self
            .product_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(Error::Overflow { row })?;
        Ok(EnrichedOrder {
            revenue,
            month: Month::from(order_date),
            order_id: self.order_id,
            customer_id: self.customer_id,
            order_date,
            product_id: self.product_id,
            product_name: self.product_name,
            product_price: self.product_price,
            quantity: self.quantity,
        })
    }
}

pub(crate) fn preprocess(table: &Table) -> Result<Vec<EnrichedOrder>, Error> {
    preprocess_with(table, DatePolicy::Strict)
}

/// Checks the schema, types every row and derives `revenue` and `month`.
///
/// All required columns are checked before failing so the error names every
/// missing one. Dates are checked for the whole table before any other value
/// is typed. Rows keep their input order; row numbers in errors are 1-based
/// data rows (the header is not counted).
///
/// The sum of `|revenue|` over the output is checked to fit in a `Decimal`,
/// so no grouping or total over these orders can overflow.
pub(crate) fn preprocess_with(
    table: &Table,
    policy: DatePolicy,
) -> Result<Vec<EnrichedOrder>, Error> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| table.column_index(column).is_none())
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::Schema { missing });
    }
    let date_column = table
        .column_index("order_date")
        .ok_or_else(|| Error::Schema {
            missing: vec!["order_date".to_string()],
        })?;

    let dates: Vec<Option<NaiveDate>> = table
        .rows()
        .iter()
        .map(|record| {
            record
                .get(date_column)
                .and_then(|value| NaiveDate::parse_from_str(value, DATE_FORMAT).ok())
        })
        .collect();
    let bad_dates: Vec<usize> = dates
        .iter()
        .enumerate()
        .filter(|(_, date)| date.is_none())
        .map(|(idx, _)| idx + 1)
        .collect();
    if !bad_dates.is_empty() {
        match policy {
            DatePolicy::Strict => return Err(Error::DateParse { rows: bad_dates }),
            DatePolicy::DropInvalid => {
                for row in &bad_dates {
                    warn!("Dropping row {row}: unparseable order_date");
                }
            }
        }
    }

    let mut orders = Vec::with_capacity(table.len());
    let mut magnitude = Decimal::ZERO;
    for (idx, (record, date)) in table.rows().iter().zip(&dates).enumerate() {
        let Some(date) = *date else {
            continue;
        };
        let row = idx + 1;
        let order: OrderRecord =
            record
                .deserialize(Some(table.headers()))
                .map_err(|e| Error::InvalidValue {
                    row,
                    message: e.to_string(),
                })?;
        let order = order.enrich(date, row)?;
        magnitude = magnitude
            .checked_add(order.revenue.abs())
            .ok_or(Error::Overflow { row })?;
        orders.push(order);
    }
    debug!("Preprocessed {} of {} rows", orders.len(), table.len());
    Ok(orders)
}
