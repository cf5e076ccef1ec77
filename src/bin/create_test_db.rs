use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use ledger_rs::{
    Account, RecurringInterval, TransactionKind, TransactionRecord, create_account,
    create_transaction, initialize_db,
};

/// A utility for creating a test database for ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test accounts...");

    for (id, name, is_default) in [
        ("checking", "Everyday Checking", true),
        ("savings", "Savings", false),
    ] {
        create_account(
            &Account {
                id: id.to_owned(),
                name: name.to_owned(),
                balance: Decimal::ZERO,
                is_default,
            },
            &conn,
        )?;
    }

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc();
    let transactions = [
        (
            TransactionKind::Income,
            Decimal::new(3_200_00, 2),
            "salary",
            "Monthly salary",
            0,
            Some(RecurringInterval::Monthly),
        ),
        (
            TransactionKind::Expense,
            Decimal::new(1_450_00, 2),
            "housing",
            "Rent",
            1,
            Some(RecurringInterval::Monthly),
        ),
        (
            TransactionKind::Expense,
            Decimal::new(87_35, 2),
            "food",
            "Weekly groceries at the supermarket down the road",
            3,
            Some(RecurringInterval::Weekly),
        ),
        (
            TransactionKind::Expense,
            Decimal::new(4_50, 2),
            "food",
            "Coffee",
            4,
            None,
        ),
        (
            TransactionKind::Expense,
            Decimal::new(62_10, 2),
            "transportation",
            "Fuel",
            6,
            None,
        ),
        (
            TransactionKind::Expense,
            Decimal::new(15_99, 2),
            "entertainment",
            "Streaming subscription",
            9,
            Some(RecurringInterval::Monthly),
        ),
        (
            TransactionKind::Income,
            Decimal::new(120_00, 2),
            "other-income",
            "Sold old bike",
            12,
            None,
        ),
        (
            TransactionKind::Expense,
            Decimal::new(210_40, 2),
            "utilities",
            "Power bill",
            15,
            None,
        ),
    ];

    for (kind, amount, category, description, days_ago, interval) in transactions {
        let date = today - Duration::days(days_ago);
        let mut builder = TransactionRecord::build(
            &uuid::Uuid::new_v4().to_string(),
            "checking",
            kind,
            amount,
            date,
        )
        .category(category)
        .description(description);

        if let Some(interval) = interval {
            let next_date = match interval {
                RecurringInterval::Daily => date + Duration::days(1),
                RecurringInterval::Weekly => date + Duration::weeks(1),
                RecurringInterval::Monthly => date + Duration::days(30),
                RecurringInterval::Yearly => date + Duration::days(365),
            };
            builder = builder.recurring(interval).next_recurring_date(next_date);
        }

        create_transaction(&builder.finish(), &conn)?;
    }

    create_transaction(
        &TransactionRecord::build(
            &uuid::Uuid::new_v4().to_string(),
            "savings",
            TransactionKind::Income,
            Decimal::new(500_00, 2),
            today - Duration::days(2),
        )
        .category("investments")
        .finish(),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
