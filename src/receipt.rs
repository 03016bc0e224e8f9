//! Order summaries handed back to intake for display.

use crate::catalog::{AddOn, Base};
use crate::customer::Category;
use crate::error::Result;
use crate::order::OrderResult;
use std::fmt;
use std::io::Write;

/// Column header of the receipts CSV.
pub const RECEIPT_HEADER: [&str; 10] = [
    "customer",
    "category",
    "base",
    "add_ons",
    "gross",
    "discount",
    "cashback_redeemed",
    "final",
    "cashback_earned",
    "balance",
];

/// Everything needed to show a customer what they paid.
///
/// Amounts are exact; the `Display` impl rounds them to centavos.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub customer: String,
    pub category: Category,
    pub base: Base,
    pub add_ons: Vec<AddOn>,
    pub result: OrderResult,
}

impl Receipt {
    /// Add-on names joined with `", "`, or `"None"`.
    pub fn add_on_list(&self) -> String {
        if self.add_ons.is_empty() {
            "None".to_string()
        } else {
            self.add_ons
                .iter()
                .map(AddOn::name)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Streams receipts as CSV, one row per order, amounts rounded to centavos.
///
/// Every row is flushed as soon as it is written, so receipts for orders
/// already persisted reach the output even if a later order fails.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    /// Wraps `writer` and writes the header row.
    pub fn new(writer: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(RECEIPT_HEADER)?;
        writer.flush()?;
        Ok(ReceiptWriter { writer })
    }

    /// Writes one receipt row and flushes it.
    pub fn write(&mut self, receipt: &Receipt) -> Result<()> {
        let add_ons = receipt
            .add_ons
            .iter()
            .map(AddOn::name)
            .collect::<Vec<_>>()
            .join(";");
        self.writer.write_record([
            receipt.customer.clone(),
            receipt.category.to_string(),
            receipt.base.to_string(),
            add_ons,
            receipt.result.gross.to_string(),
            receipt.result.discount.to_string(),
            receipt.result.cashback_redeemed.to_string(),
            receipt.result.final_amount.to_string(),
            receipt.result.cashback_earned.to_string(),
            receipt.result.balance.to_string(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ORDER SUMMARY")?;
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f, "Base: {}", self.base)?;
        writeln!(f, "Add-ons: {}", self.add_on_list())?;
        match self.category {
            Category::Student => writeln!(f, "Student discount applied")?,
            Category::Staff => writeln!(f, "Staff discount applied")?,
            Category::Community => {}
        }
        writeln!(f, "Total: R$ {}", self.result.final_amount)?;
        if self.result.cashback_redeemed.is_positive() {
            writeln!(f, "Cashback used: R$ {}", self.result.cashback_redeemed)?;
        } else {
            writeln!(f, "Cashback not used.")?;
        }
        write!(f, "Cashback balance: R$ {}", self.result.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn receipt(category: Category, add_ons: Vec<AddOn>, redeemed: &str) -> Receipt {
        Receipt {
            customer: "Ana".to_string(),
            category,
            base: Base::Maracuja,
            add_ons,
            result: OrderResult {
                gross: money("4.60"),
                discount: money("1.15"),
                net: money("3.45"),
                cashback_redeemed: money(redeemed),
                final_amount: money("3.45") - money(redeemed),
                cashback_earned: money("0.345"),
                balance: money("1.2345"),
            },
        }
    }

    #[test]
    fn test_summary_with_redemption() {
        let text = receipt(Category::Student, vec![AddOn::Boba, AddOn::Chia], "0.50").to_string();

        assert!(text.contains("Customer: Ana"));
        assert!(text.contains("Base: Maracujá"));
        assert!(text.contains("Add-ons: Boba, Chia"));
        assert!(text.contains("Student discount applied"));
        assert!(text.contains("Total: R$ 2.95"));
        assert!(text.contains("Cashback used: R$ 0.50"));
        assert!(text.ends_with("Cashback balance: R$ 1.23"));
    }

    #[test]
    fn test_writer_emits_header_and_rounded_row() {
        let mut output = Vec::new();
        {
            let mut writer = ReceiptWriter::new(&mut output).unwrap();
            writer
                .write(&receipt(Category::Student, vec![AddOn::Boba, AddOn::Chia], "0.50"))
                .unwrap();
        }
        let output_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output_str.lines().collect();

        assert_eq!(lines[0], RECEIPT_HEADER.join(","));
        assert_eq!(lines[1], "Ana,student,Maracujá,Boba;Chia,4.60,1.15,0.50,2.95,0.35,1.23");
    }

    #[test]
    fn test_summary_without_add_ons_or_redemption() {
        let text = receipt(Category::Community, Vec::new(), "0").to_string();

        assert!(text.contains("Add-ons: None"));
        assert!(!text.contains("discount applied"));
        assert!(text.contains("Cashback not used."));
    }
}
