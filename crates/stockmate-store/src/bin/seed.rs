//! # Seed Data Generator
//!
//! Fills a fresh store with the standard master data, pushes a handful of
//! weighings through the submission flow and prints the per-polisher report.
//!
//! ## Usage
//! ```bash
//! # Default 2% tolerance, today's date on the report
//! cargo run -p stockmate-store --bin seed
//!
//! # Wider band, fixed report date
//! cargo run -p stockmate-store --bin seed -- --tolerance 3 --date 2026-10-18
//!
//! # More logging
//! RUST_LOG=debug cargo run -p stockmate-store --bin seed
//! ```
//!
//! ## Master Data
//! - Items: C001 Item A (0.95 kg/dozen), C002 Item B (0.80), C003 Item C (0.90)
//! - Bag types: Tray (1.6 kg), Plastic Bag (0.6 kg), Sack Bag (0.1 kg)
//! - Polishers: Polisher A, Polisher B

use std::env;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stockmate_core::batch::summarize_by_polisher;
use stockmate_core::report::ReportRow;
use stockmate_core::{
    BagTypeForm, ItemForm, PolisherForm, Role, Session, SubmitOutcome, ToleranceFraction,
};
use stockmate_store::{Store, StoreConfig};

/// (code, name, standard weight per dozen)
const ITEMS: &[(&str, &str, f64)] = &[
    ("C001", "Item A", 0.95),
    ("C002", "Item B", 0.80),
    ("C003", "Item C", 0.90),
];

/// (name, tare weight)
const BAG_TYPES: &[(&str, f64)] = &[("Tray", 1.6), ("Plastic Bag", 0.6), ("Sack Bag", 0.1)];

/// (first name, last name, contact number)
const POLISHERS: &[(&str, &str, &str)] = &[
    ("Polisher", "A", "0771234567"),
    ("Polisher", "B", "0719876543"),
];

/// (item index, bag index, polisher index, dozens, gross weight)
const WEIGHINGS: &[(usize, usize, usize, u32, f64)] = &[
    (1, 0, 0, 12, 11.2),
    (0, 1, 0, 10, 10.3),
    (2, 2, 0, 20, 18.0),
    (1, 1, 1, 6, 5.0),
    (0, 0, 1, 8, 9.25),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = StoreConfig::from_env()?;
    let mut report_date: NaiveDate = Local::now().date_naive();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tolerance" | "-t" => {
                let pct: f64 = option_value(&args, i)?.parse()?;
                config = config.tolerance(ToleranceFraction::from_percentage(pct));
                i += 1;
            }
            "--date" | "-d" => {
                report_date = NaiveDate::parse_from_str(option_value(&args, i)?, "%Y-%m-%d")?;
                i += 1;
            }
            "--help" | "-h" => {
                println!("StockMate Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -t, --tolerance <PCT>  Tolerance band in percent (default: 2)");
                println!("  -d, --date <YYYY-MM-DD> Report date (default: today)");
                println!("  -h, --help             Show this help message");
                println!();
                println!("Environment:");
                println!("  STOCKMATE_TOLERANCE_PERCENT, STOCKMATE_DISPLAY_DECIMALS, RUST_LOG");
                return Ok(());
            }
            other => return Err(format!("unknown option '{other}', see --help").into()),
        }
        i += 1;
    }

    println!("🌱 StockMate Seed Data Generator");
    println!("================================");
    println!("Tolerance: {}%", config.tolerance.percentage());
    println!();

    let store = Store::new(config)?;
    let session = Session::new("admin", Role::Admin);

    // Master data
    let mut items = Vec::with_capacity(ITEMS.len());
    for (code, name, standard_weight) in ITEMS {
        let form = ItemForm {
            code: code.to_string(),
            name: name.to_string(),
            standard_weight: *standard_weight,
        };
        items.push(store.items().create(form).await?);
    }

    let mut bag_types = Vec::with_capacity(BAG_TYPES.len());
    for (name, weight) in BAG_TYPES {
        let form = BagTypeForm {
            name: name.to_string(),
            weight: *weight,
        };
        bag_types.push(store.bag_types().create(form).await?);
    }

    let mut polishers = Vec::with_capacity(POLISHERS.len());
    for (first_name, last_name, contact_number) in POLISHERS {
        let form = PolisherForm {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            contact_number: contact_number.to_string(),
        };
        polishers.push(store.polishers().create(form).await?);
    }

    println!(
        "✓ Seeded {} items, {} bag types, {} polishers",
        items.len(),
        bag_types.len(),
        polishers.len()
    );

    // Weighings
    println!();
    println!("Recording weighings...");

    for &(item_idx, bag_idx, polisher_idx, dozens, gross_weight) in WEIGHINGS {
        let draft = store
            .draft(
                &items[item_idx].id,
                &bag_types[bag_idx].id,
                &polishers[polisher_idx].id,
                dozens,
                gross_weight,
            )
            .await?;

        let mut submission = store.new_submission(draft);
        let committed = match submission.submit()? {
            SubmitOutcome::Committed(committed) => committed,
            SubmitOutcome::NeedsConfirmation(result) => {
                warn!(
                    item = %items[item_idx].code,
                    verdict = result.verdict.label(),
                    difference = result.difference,
                    "Outside tolerance, submitting anyway"
                );
                submission.confirm()?
            }
        };

        let entry = store.entries().record(&session, committed).await?;
        println!(
            "  {} {:>3} dz  net {:.3} kg  expected {:.3} kg  {}",
            entry.item_code,
            entry.dozens,
            entry.net_weight,
            entry.expected_weight,
            entry.verdict.label()
        );
    }

    // Reports
    for polisher in &polishers {
        let report = store
            .entries()
            .report(Some(&polisher.id), report_date)
            .await?;

        println!();
        println!("{} - {} ({})", report.title, report.polisher_name, report.generated_on);
        println!("{}", ReportRow::HEADERS.join(" | "));
        for row in &report.rows {
            println!("{}", row.cells().join(" | "));
        }
        for line in report.footer_lines() {
            println!("  {}", line);
        }
        println!("  File: {}", report.file_name(report_date));
    }

    for (polisher_id, group) in summarize_by_polisher(&store.entries().list().await) {
        info!(
            polisher = %polisher_id,
            entries = group.count,
            dozens = group.total_dozens,
            net_weight = group.total_net_weight,
            avg_abs_deviation = group.avg_abs_deviation,
            "Polisher totals"
        );
    }

    let summary = store.entries().summary(None).await;
    info!(
        entries = summary.count,
        within = summary.within_count,
        out_of_tolerance = summary.out_of_tolerance_count(),
        "Seed complete"
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// The value following the flag at `args[i]`.
fn option_value(args: &[String], i: usize) -> Result<&str, String> {
    match args.get(i + 1) {
        Some(value) if !value.starts_with("--") => Ok(value.as_str()),
        _ => Err(format!("{} requires a value", args[i])),
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise info, with debug for our crates.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockmate_store=debug,stockmate_core=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
