use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{SQLiteTransactionStore, TransactionStore, initialize_db, parse_seed_feed};

/// A utility for creating a test database for the REST API server of sales_dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// File path to a JSON file in the same format as the seed feed.
    #[arg(long, short)]
    feed_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Reading transactions from {:#?}", args.feed_path);
    let feed = fs::read_to_string(&args.feed_path)?;
    let records = parse_seed_feed(&feed)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let inserted = store.insert_all(&records)?;
    println!("Inserted {inserted} transactions.");

    println!("Success!");

    Ok(())
}
