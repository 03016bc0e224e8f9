//! Bubble Tea POS CLI
//!
//! Settles a batch of orders against the persistent customer ledger and
//! prints one receipt row per settled order.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- orders.csv [customers.json] > receipts.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use bubble_tea_pos::{ReceiptWriter, Result, Shop, ShopError, DEFAULT_LEDGER_FILE};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(ShopError::MissingArgument);
    }

    let orders_path = &args[1];
    let ledger_path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(DEFAULT_LEDGER_FILE);

    let file = File::open(orders_path)?;
    let reader = BufReader::new(file);

    let mut shop = Shop::open(ledger_path)?;

    let stdout = io::stdout();
    let mut receipts = ReceiptWriter::new(stdout.lock())?;
    shop.process_csv(reader, |receipt| receipts.write(receipt))?;

    Ok(())
}
