use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

const PRODUCTS: [&str; 20] = [
    "Carbonated Water - Orange",
    "Artichoke - Fresh",
    "Soup - Campbells Chili Veg",
    "Pork Loin Bine - In Frenched",
    "Calvados - Boulard",
    "Cookies Almond Hazelnut",
    "Cheese - Pied De Vents",
    "Sea Bass - Fillets",
    "Soup - Knorr, Ministrone",
    "Venison - Denver Leg Boneless",
    "Pork Salted Bellies",
    "Roe - Flying Fish",
    "Onion Powder",
    "Sole - Fillet",
    "Ostrich - Prime Cut",
    "Pie Shell - 5",
    "Clams - Littleneck, Whole",
    "Cucumber - English",
    "Beef - Tongue, Cooked",
    "Lobster - Tail 6 Oz",
];

const ID_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Orders are spread over this many days before the end date (inclusive).
const DATE_SPAN_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub(crate) struct GenerateOptions {
    pub rows: usize,
    pub customers: u32,
    pub end_date: NaiveDate,
}

impl GenerateOptions {
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            rows: 10_000,
            customers: 100,
            end_date,
        }
    }
}

/// One synthetic order, serialized with the column names the loader expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OrderRow {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: NaiveDate,
    pub product_id: String,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: u32,
}

/// Replaces every `#` with a digit and every `?` with an id letter.
fn bothify<R: Rng>(rng: &mut R, pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.gen_range(0..10u8)),
            '?' => char::from(ID_LETTERS[rng.gen_range(0..ID_LETTERS.len())]),
            other => other,
        })
        .collect()
}

/// Builds `options.rows` random orders. Each product name gets one product id
/// for the whole dataset; prices are in [5.00, 100.00] with cent precision.
pub(crate) fn generate_orders<R: Rng>(rng: &mut R, options: &GenerateOptions) -> Vec<OrderRow> {
    let product_ids: Vec<String> = PRODUCTS
        .iter()
        .map(|_| bothify(rng, "PROD-#####-??????"))
        .collect();

    (0..options.rows)
        .map(|_| {
            let product = rng.gen_range(0..PRODUCTS.len());
            let days_back = rng.gen_range(0..=DATE_SPAN_DAYS);
            OrderRow {
                order_id: bothify(rng, "order-#####-??????"),
                customer_id: format!("Customer_{}", rng.gen_range(1..=options.customers)),
                order_date: options.end_date - Duration::days(days_back),
                product_id: product_ids[product].clone(),
                product_name: PRODUCTS[product].to_string(),
                product_price: Decimal::new(rng.gen_range(500..=10_000), 2),
                quantity: rng.gen_range(1..=5),
            }
        })
        .collect()
}

/// Basic CSV exporter for generated orders.
pub(crate) fn write_orders<W: Write>(writer: W, orders: &[OrderRow]) -> Result<(), anyhow::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for order in orders {
        wtr.serialize(order)?;
    }
    wtr.flush()?;
    Ok(())
}
