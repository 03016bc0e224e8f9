//! The shop counter: ledger plus settlement, exposed to order intake.
//!
//! Each order is resolved against the ledger, settled, and persisted before
//! the next one is looked at. The shop owns its ledger; there is no global
//! customer state.

use crate::customer::{Category, CustomerRecord};
use crate::engine;
use crate::error::{Result, ShopError};
use crate::ledger::{Ledger, LoadOutcome};
use crate::order::{OrderRecord, OrderRequest};
use crate::receipt::Receipt;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::Read;
use std::path::PathBuf;

/// Point-of-sale session over a persistent customer ledger.
pub struct Shop {
    ledger: Ledger,
}

impl Shop {
    /// Opens the ledger at `path`.
    ///
    /// A missing or malformed ledger file starts the shop with no customers;
    /// discarding a malformed file is logged at warn level.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let (ledger, outcome) = Ledger::load(path)?;
        match &outcome {
            LoadOutcome::Loaded { customers } => {
                debug!("Opened ledger {} with {} customers", ledger.path().display(), customers)
            }
            LoadOutcome::Missing => {
                debug!("Ledger {} does not exist yet", ledger.path().display())
            }
            LoadOutcome::Recovered { reason } => warn!(
                "Ledger {} is unreadable, starting with no customers: {}",
                ledger.path().display(),
                reason
            ),
        }
        Ok(Shop::with_ledger(ledger))
    }

    /// Wraps an already loaded ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Shop { ledger }
    }

    /// The customer ledger backing this shop.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns the customer called `name`, registering them with
    /// `category_if_new` (default `community`) on first sight.
    pub fn resolve_or_create_customer(
        &mut self,
        name: &str,
        category_if_new: Option<Category>,
    ) -> &CustomerRecord {
        self.ledger.resolve_or_create(name, category_if_new)
    }

    /// Settles `order` for an already registered customer and persists the
    /// updated ledger.
    pub fn submit_order(&mut self, order: &OrderRequest) -> Result<Receipt> {
        let customer = self
            .ledger
            .lookup_mut(&order.customer)
            .ok_or_else(|| ShopError::UnknownCustomer(order.customer.clone()))?;

        let result = engine::settle(customer, order);
        let receipt = Receipt {
            customer: customer.name().to_string(),
            category: customer.category(),
            base: order.base,
            add_ons: order.add_ons.clone(),
            result,
        };

        self.ledger.persist()?;
        Ok(receipt)
    }

    /// Settles every order in a CSV batch, in file order, handing each
    /// receipt to `on_receipt` as soon as its order has been persisted.
    ///
    /// Invalid rows are logged at warn level and skipped. Ledger write
    /// failures abort the batch; receipts for rows settled before the failure
    /// have already been delivered. Returns the number of settled orders.
    pub fn process_csv<R, F>(&mut self, reader: R, mut on_receipt: F) -> Result<usize>
    where
        R: Read,
        F: FnMut(&Receipt) -> Result<()>,
    {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut settled = 0;

        for (row_idx, result) in csv_reader.deserialize::<OrderRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    continue;
                }
            };

            let parsed = match record.parse(row_num) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    continue;
                }
            };

            self.resolve_or_create_customer(&parsed.request.customer, parsed.category);
            let receipt = self.submit_order(&parsed.request)?;
            debug!(
                "Row {}: {} paid {} (balance {})",
                row_num, receipt.customer, receipt.result.final_amount, receipt.result.balance
            );
            on_receipt(&receipt)?;
            settled += 1;
        }

        Ok(settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AddOn, Base};
    use crate::money::Money;
    use crate::receipt::ReceiptWriter;
    use std::fs;
    use std::io::Cursor;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn open_shop(dir: &TempDir) -> Shop {
        Shop::open(dir.path().join("customers.json")).unwrap()
    }

    fn collect_receipts(shop: &mut Shop, csv: &str) -> Vec<Receipt> {
        let mut receipts = Vec::new();
        let settled = shop
            .process_csv(Cursor::new(csv), |receipt| {
                receipts.push(receipt.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(settled, receipts.len());
        receipts
    }

    #[test]
    fn test_submit_order_persists_balance() {
        let dir = TempDir::new().unwrap();
        let mut shop = open_shop(&dir);

        shop.resolve_or_create_customer("Ana", Some(Category::Student));
        let receipt = shop
            .submit_order(&OrderRequest::new("Ana", Base::Leite, Vec::new()))
            .unwrap();
        assert_eq!(receipt.result.final_amount, money("3.2625"));

        let reopened = open_shop(&dir);
        let ana = reopened.ledger().lookup("Ana").unwrap();
        assert_eq!(ana.category(), Category::Student);
        assert_eq!(ana.cashback_balance(), money("0.32625"));
    }

    #[test]
    fn test_submit_order_requires_registration() {
        let dir = TempDir::new().unwrap();
        let mut shop = open_shop(&dir);

        let result = shop.submit_order(&OrderRequest::new("Ghost", Base::Rosa, Vec::new()));
        assert!(matches!(result, Err(ShopError::UnknownCustomer(name)) if name == "Ghost"));
    }

    #[test]
    fn test_process_csv_settles_in_order() {
        let dir = TempDir::new().unwrap();
        let mut shop = open_shop(&dir);

        let csv = r#"customer,category,base,add_ons,redeem
bia,staff,Leite,,
Bia,,Leite,,yes"#;

        let receipts = collect_receipts(&mut shop, csv);
        assert_eq!(receipts.len(), 2);

        assert_eq!(receipts[0].result.balance, money("0.335"));
        assert_eq!(receipts[1].result.cashback_redeemed, money("0.335"));
        assert_eq!(receipts[1].result.final_amount, money("3.015"));
        assert_eq!(receipts[1].result.balance, money("0.335"));
    }

    #[test]
    fn test_process_csv_skips_invalid_rows() {
        let dir = TempDir::new().unwrap();
        let mut shop = open_shop(&dir);

        let csv = r#"customer,category,base,add_ons,redeem
Ana,,Cafe,,
Ana,vip,Leite,,
,,Leite,,
Ana,,Leite,Boba;Ketchup,
Ana,,Rosa,Taro,"#;

        let receipts = collect_receipts(&mut shop, csv);
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].base, Base::Rosa);
        assert_eq!(receipts[0].add_ons, vec![AddOn::Taro]);
        assert_eq!(shop.ledger().len(), 1);
    }

    #[test]
    fn test_category_ignored_for_existing_customer() {
        let dir = TempDir::new().unwrap();
        let mut shop = open_shop(&dir);

        let csv = r#"customer,category,base,add_ons,redeem
Caio,community,Manga,,
Caio,student,Manga,,"#;

        let receipts = collect_receipts(&mut shop, csv);
        assert_eq!(receipts[1].category, Category::Community);
        assert_eq!(receipts[1].result.discount, Money::ZERO);
    }

    #[test]
    fn test_receipts_stream_as_orders_settle() {
        let dir = TempDir::new().unwrap();
        let mut shop = open_shop(&dir);

        let csv = r#"customer,category,base,add_ons,redeem
Ana,student,Leite,Boba;Chia,"#;

        let mut output = Vec::new();
        {
            let mut writer = ReceiptWriter::new(&mut output).unwrap();
            shop.process_csv(Cursor::new(csv), |receipt| writer.write(receipt))
                .unwrap();
        }
        let output_str = String::from_utf8(output).unwrap();

        // gross 5.20, discount 1.30, net 3.90, earned 0.39
        assert!(output_str.contains("Ana,student,Leite,Boba;Chia,5.20,1.30,0.00,3.90,0.39,0.39"));
    }

    #[test]
    fn test_failed_persist_keeps_earlier_receipts() {
        let dir = TempDir::new().unwrap();
        let ledger_dir = dir.path().join("ledger");
        fs::create_dir(&ledger_dir).unwrap();
        let mut shop = Shop::open(ledger_dir.join("customers.json")).unwrap();

        let csv = r#"customer,category,base,add_ons,redeem
Ana,staff,Leite,,
Bia,student,Rosa,,
Caio,,Manga,,"#;

        let mut output = Vec::new();
        let result = {
            let mut writer = ReceiptWriter::new(&mut output).unwrap();
            shop.process_csv(Cursor::new(csv), |receipt| {
                writer.write(receipt)?;
                // Pull the ledger directory out from under the next persist
                if ledger_dir.exists() {
                    fs::remove_dir_all(&ledger_dir)?;
                }
                Ok(())
            })
        };

        assert!(matches!(result, Err(ShopError::Io(_))));
        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("Ana,staff,Leite,,4.35,1.00,0.00,3.35,0.34,0.34"));
        assert!(!output_str.contains("Bia"));
    }
}
