//! Shared fixtures for the unit tests.

use crate::{data::EnrichedOrder, preprocess::preprocess, read::load_from_reader};

pub(crate) const SAMPLE_ORDERS_CSV: &str = "\
order_id,customer_id,order_date,product_id,product_name,product_price,quantity
1,101,2023-01-01,1001,Widget A,10.0,2
2,102,2023-01-02,1002,Widget B,20.0,1
3,101,2023-02-01,1001,Widget A,10.0,1
4,103,2023-02-01,1003,Widget C,30.0,3
";

pub(crate) fn sample_orders() -> Vec<EnrichedOrder> {
    let table = load_from_reader(SAMPLE_ORDERS_CSV.as_bytes()).unwrap();
    preprocess(&table).unwrap()
}
