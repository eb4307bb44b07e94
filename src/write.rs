use crate::{
    compute::{Report, RevenueSummary},
    data::EnrichedOrder,
};
use rust_decimal::Decimal;
use std::{fmt::Display, fs, io::Write, path::Path};
use tracing::info;

const TOTAL_COLUMN: &str = "Total Revenue";

/// Totals are printed as computed unless the caller asks for a fixed number of
/// decimal places.
fn format_total(total: Decimal, round: Option<u32>) -> String {
    match round {
        Some(dp) => {
            let mut total = total;
            total.rescale(dp);
            total.to_string()
        }
        None => total.to_string(),
    }
}

/// Prints one summary under `title` as an aligned text table.
pub(crate) fn write_summary<W: Write, K: Display>(
    mut out: W,
    title: &str,
    summary: &RevenueSummary<K>,
    round: Option<u32>,
) -> Result<(), anyhow::Error> {
    let cells: Vec<(String, String)> = summary
        .rows
        .iter()
        .map(|row| (row.key.to_string(), format_total(row.total_revenue, round)))
        .collect();
    let key_width = cells
        .iter()
        .map(|(key, _)| key.chars().count())
        .fold(summary.key_column.chars().count(), usize::max);
    let total_width = cells
        .iter()
        .map(|(_, total)| total.chars().count())
        .fold(TOTAL_COLUMN.len(), usize::max);

    writeln!(out, "{title}")?;
    writeln!(
        out,
        "{:<key_width$}  {:>total_width$}",
        summary.key_column, TOTAL_COLUMN
    )?;
    for (key, total) in &cells {
        writeln!(out, "{key:<key_width$}  {total:>total_width$}")?;
    }
    Ok(())
}

/// Prints the four tables in their fixed order, separated by blank lines.
pub(crate) fn write_report<W: Write>(
    mut out: W,
    report: &Report,
    round: Option<u32>,
) -> Result<(), anyhow::Error> {
    write_summary(&mut out, "Total Revenue by Month:", &report.monthly, round)?;
    writeln!(out)?;
    write_summary(&mut out, "Total Revenue by Product:", &report.products, round)?;
    writeln!(out)?;
    write_summary(&mut out, "Total Revenue by Customer:", &report.customers, round)?;
    writeln!(out)?;
    let title = format!("Top {} Customers by Revenue:", report.top);
    write_summary(&mut out, &title, &report.top_customers, round)?;
    out.flush()?;
    Ok(())
}

/// Basic CSV exporter for a summary.
pub(crate) fn write_summary_csv<W: Write, K: Display>(
    writer: W,
    summary: &RevenueSummary<K>,
    round: Option<u32>,
) -> Result<(), anyhow::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([summary.key_column, TOTAL_COLUMN])?;
    for row in &summary.rows {
        wtr.write_record([row.key.to_string(), format_total(row.total_revenue, round)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV exporter for the enriched orders: the input columns plus `revenue`
/// and `month`.
pub(crate) fn write_orders_csv<W: Write>(
    writer: W,
    orders: &[EnrichedOrder],
) -> Result<(), anyhow::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for order in orders {
        wtr.serialize(order)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the enriched orders and every table of the report as CSV files
/// under `dir`.
pub(crate) fn export_report(
    dir: &Path,
    orders: &[EnrichedOrder],
    report: &Report,
    round: Option<u32>,
) -> Result<(), anyhow::Error> {
    fs::create_dir_all(dir)?;
    write_orders_csv(fs::File::create(dir.join("enriched_orders.csv"))?, orders)?;
    write_summary_csv(
        fs::File::create(dir.join("monthly_revenue.csv"))?,
        &report.monthly,
        round,
    )?;
    write_summary_csv(
        fs::File::create(dir.join("product_revenue.csv"))?,
        &report.products,
        round,
    )?;
    write_summary_csv(
        fs::File::create(dir.join("customer_revenue.csv"))?,
        &report.customers,
        round,
    )?;
    write_summary_csv(
        fs::File::create(dir.join("top_customers.csv"))?,
        &report.top_customers,
        round,
    )?;
    info!("Exported revenue tables to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        compute::{by_month, Report, RevenueRow, RevenueSummary, TOP_CUSTOMERS},
        testing::sample_orders,
        write::{export_report, write_orders_csv, write_report, write_summary, write_summary_csv},
    };
    use rust_decimal_macros::dec;

    #[test]
    fn print_report() {
        let report = Report::build(&sample_orders(), TOP_CUSTOMERS);
        let mut out = Vec::new();
        write_report(&mut out, &report, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Total Revenue by Month:
Month    Total Revenue
2023-01           40.0
2023-02          100.0

Total Revenue by Product:
Product Name  Total Revenue
Widget A               30.0
Widget B               20.0
Widget C               90.0

Total Revenue by Customer:
Customer ID  Total Revenue
101                   30.0
102                   20.0
103                   90.0

Top 10 Customers by Revenue:
Customer ID  Total Revenue
103                   90.0
101                   30.0
102                   20.0
"
        );
    }

    #[test]
    fn print_rounded_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, "Total Revenue by Month:", &by_month(&sample_orders()), Some(2))
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Total Revenue by Month:
Month    Total Revenue
2023-01          40.00
2023-02         100.00
"
        );
    }

    #[test]
    fn non_ascii_keys_stay_aligned() {
        let summary = RevenueSummary {
            key_column: "Product Name",
            rows: vec![
                RevenueRow {
                    key: "Crème brûlée - Café".to_string(),
                    total_revenue: dec!(12.5),
                },
                RevenueRow {
                    key: "Tea".to_string(),
                    total_revenue: dec!(3),
                },
            ],
        };
        let mut out = Vec::new();
        write_summary(&mut out, "Total Revenue by Product:", &summary, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Total Revenue by Product:
Product Name         Total Revenue
Crème brûlée - Café           12.5
Tea                              3
"
        );
    }

    #[test]
    fn summary_csv() {
        let mut out = Vec::new();
        write_summary_csv(&mut out, &by_month(&sample_orders()), None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Month,Total Revenue\n2023-01,40.0\n2023-02,100.0\n"
        );
    }

    #[test]
    fn export_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("reports");
        let orders = sample_orders();
        let report = Report::build(&orders, TOP_CUSTOMERS);
        export_report(&out_dir, &orders, &report, Some(1)).unwrap();
        let top = std::fs::read_to_string(out_dir.join("top_customers.csv")).unwrap();
        assert_eq!(top, "Customer ID,Total Revenue\n103,90.0\n101,30.0\n102,20.0\n");
        for name in ["enriched_orders.csv", "monthly_revenue.csv", "product_revenue.csv", "customer_revenue.csv"] {
            assert!(out_dir.join(name).is_file(), "{name} should be written");
        }
    }

    #[test]
    fn enriched_orders_csv() {
        let mut out = Vec::new();
        write_orders_csv(&mut out, &sample_orders()[..2]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
order_id,customer_id,order_date,product_id,product_name,product_price,quantity,revenue,month
1,101,2023-01-01,1001,Widget A,10.0,2,20.0,2023-01
2,102,2023-01-02,1002,Widget B,20.0,1,20.0,2023-01
"
        );
    }
}
