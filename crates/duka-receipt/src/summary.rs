//! # On-Screen Summary
//!
//! The receipt as plain text for the checkout confirmation screen. No
//! columns and no paging, just one line per item.

use std::fmt::Write;

use crate::receipt::Receipt;

/// Renders the receipt as plain text.
///
/// ```text
/// SALES RECEIPT
/// Receipt: sale_1
/// Date: 2026-10-16 14:03:22
/// Customer: Jane
/// Payment: Cash
///
/// Orthopedic Knee Brace x2 @ 2,500 = 5,000
///
/// Total: KES 5,000
/// Thank you for your business!
/// ```
pub fn render_summary(receipt: &Receipt) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", receipt.title);
    for (label, value) in receipt.metadata() {
        let _ = writeln!(out, "{}: {}", label, value);
    }
    out.push('\n');

    for row in &receipt.rows {
        let _ = writeln!(
            out,
            "{} x{} @ {} = {}",
            row.name, row.quantity, row.unit_price, row.line_total
        );
    }
    out.push('\n');

    let _ = writeln!(out, "Total: {}", receipt.grand_total);
    out.push_str(&receipt.footer);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::Issuer;
    use crate::test_support::sale_with;
    use duka_core::CurrencyFormat;

    #[test]
    fn test_summary_lists_every_item_and_total() {
        let sale = sale_with(&[("Orthopedic Knee Brace", 2500, 2), ("Spine Support Belt", 1800, 1)]);
        let receipt = Receipt::from_sale(&sale, &Issuer::default(), &CurrencyFormat::default());
        let text = render_summary(&receipt);

        assert!(text.starts_with("SALES RECEIPT\n"));
        assert!(text.contains("Receipt: sale_7\n"));
        assert!(text.contains("Customer: Jane\n"));
        assert!(text.contains("Payment: Mobile Money\n"));
        assert!(text.contains("Orthopedic Knee Brace x2 @ 2,500 = 5,000\n"));
        assert!(text.contains("Spine Support Belt x1 @ 1,800 = 1,800\n"));
        assert!(text.contains("Total: KES 6,800\n"));
        assert!(text.ends_with("Thank you for your business!"));
    }

    #[test]
    fn test_summary_does_not_wrap_names() {
        let name = "Post-Operative Hinged Knee Immobilizer with Adjustable Straps";
        let sale = sale_with(&[(name, 9000, 1)]);
        let receipt = Receipt::from_sale(&sale, &Issuer::default(), &CurrencyFormat::default());

        assert!(render_summary(&receipt).contains(name));
    }
}
