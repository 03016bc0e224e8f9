//! Persistent customer ledger.
//!
//! The whole ledger lives in memory and is written back as a full JSON
//! snapshot after every order:
//!
//! ```json
//! {
//!     "Ana": {
//!         "category": "student",
//!         "cashbackBalance": 0.32625
//!     }
//! }
//! ```
//!
//! A missing file is an empty ledger. A malformed file is also treated as an
//! empty ledger, but the recovery is reported through [`LoadOutcome`] so the
//! caller can log it.

use crate::customer::{Category, CustomerRecord};
use crate::error::{Result, ShopError};
use crate::money::Money;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Ledger file used when no path is given.
pub const DEFAULT_LEDGER_FILE: &str = "customers.json";

/// Per-customer value stored under the customer's name.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCustomer {
    category: Category,
    cashback_balance: Money,
}

/// How the ledger came to be when it was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Storage was read successfully.
    Loaded { customers: usize },

    /// No storage existed yet; the ledger starts empty.
    Missing,

    /// Storage was malformed and has been discarded; the ledger starts empty.
    Recovered { reason: String },
}

impl LoadOutcome {
    /// Returns `true` if stored data was discarded.
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered { .. })
    }
}

/// Mapping of customer name to record, backed by a JSON file.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    customers: BTreeMap<String, CustomerRecord>,
}

impl Ledger {
    /// Creates an empty ledger that will persist to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Ledger {
            path: path.into(),
            customers: BTreeMap::new(),
        }
    }

    /// Loads the ledger stored at `path`.
    ///
    /// Never fails because of missing or malformed content; only I/O errors
    /// other than "not found" (permissions, for example) are returned.
    pub fn load(path: impl Into<PathBuf>) -> Result<(Self, LoadOutcome)> {
        let mut ledger = Ledger::new(path);

        let content = match fs::read_to_string(&ledger.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No ledger at {}, starting empty", ledger.path.display());
                return Ok((ledger, LoadOutcome::Missing));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                let reason = format!("ledger is not valid UTF-8: {}", e);
                return Ok((ledger, LoadOutcome::Recovered { reason }));
            }
            Err(e) => return Err(e.into()),
        };

        match parse_snapshot(&content) {
            Ok(customers) => {
                let outcome = LoadOutcome::Loaded {
                    customers: customers.len(),
                };
                ledger.customers = customers;
                debug!(
                    "Loaded {} customers from {}",
                    ledger.customers.len(),
                    ledger.path.display()
                );
                Ok((ledger, outcome))
            }
            Err(e) => Ok((
                ledger,
                LoadOutcome::Recovered {
                    reason: e.to_string(),
                },
            )),
        }
    }

    /// Path the ledger persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Looks up a customer by exact name.
    pub fn lookup(&self, name: &str) -> Option<&CustomerRecord> {
        self.customers.get(name)
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut CustomerRecord> {
        self.customers.get_mut(name)
    }

    /// Inserts `record`, replacing any existing entry with the same name.
    pub fn register(&mut self, record: CustomerRecord) {
        self.customers.insert(record.name().to_string(), record);
    }

    /// Returns the customer called `name`, registering them with
    /// `category_if_new` (or `community`) if they are not known yet.
    ///
    /// The category of an existing customer is never changed.
    pub fn resolve_or_create(
        &mut self,
        name: &str,
        category_if_new: Option<Category>,
    ) -> &mut CustomerRecord {
        self.customers.entry(name.to_string()).or_insert_with(|| {
            let category = category_if_new.unwrap_or_default();
            debug!("Registering new customer {} as {}", name, category);
            CustomerRecord::new(name, category)
        })
    }

    /// All customers sorted by name.
    pub fn customers(&self) -> impl Iterator<Item = &CustomerRecord> {
        self.customers.values()
    }

    /// Serializes the full ledger, replacing whatever the file held before.
    ///
    /// The snapshot is written to a sibling temporary file and renamed over
    /// the target, so readers see either the old or the new ledger.
    pub fn persist(&self) -> Result<()> {
        let json = render_snapshot(&self.customers)?;

        let tmp_path = temp_path(&self.path);
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        debug!(
            "Persisted {} customers to {}",
            self.customers.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_LEDGER_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Parses ledger JSON into records.
///
/// Any structural problem (not JSON, wrong shape, unknown category,
/// negative balance) is reported as `CorruptStorage`.
fn parse_snapshot(content: &str) -> Result<BTreeMap<String, CustomerRecord>> {
    let stored: BTreeMap<String, StoredCustomer> =
        serde_json::from_str(content).map_err(|e| ShopError::CorruptStorage(e.to_string()))?;

    stored
        .into_iter()
        .map(|(name, entry)| {
            let record = CustomerRecord::restore(name.clone(), entry.category, entry.cashback_balance)?;
            Ok((name, record))
        })
        .collect()
}

fn render_snapshot(customers: &BTreeMap<String, CustomerRecord>) -> Result<String> {
    let stored: BTreeMap<&str, StoredCustomer> = customers
        .iter()
        .map(|(name, record)| {
            (
                name.as_str(),
                StoredCustomer {
                    category: record.category(),
                    cashback_balance: record.cashback_balance(),
                },
            )
        })
        .collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    stored.serialize(&mut serializer)?;
    buf.push(b'\n');

    String::from_utf8(buf).map_err(|e| ShopError::CorruptStorage(e.to_string()))
}
