//! # Console Till
//!
//! A line-oriented driver over the commands, so the till can run in a
//! terminal without the graphical UI.
//!
//! ```text
//! > search brace
//! p1   1001     Orthopedic Knee Brace               KES 2,500  stock   10
//! > add p1 2
//! p1   Orthopedic Knee Brace x2 @ 2,500 = 5,000
//! Subtotal: KES 5,000
//! > checkout cash Jane
//! SALES RECEIPT
//! ...
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use duka_core::{CurrencyFormat, Money};

use crate::commands::cart::CartResponse;
use crate::commands::product::ProductDto;
use crate::commands::{cart, product, report, sale};
use crate::error::ApiError;
use crate::state::Session;

const HELP: &str = "\
Commands:
  search [text]               find products (blank lists all)
  show <id>                   product details
  add <id> [qty]              add to cart (default 1)
  qty <id> <qty>              set a cart line's quantity
  remove <id>                 remove a cart line
  cart                        show the cart
  clear                       empty the cart
  checkout <payment> [name]   pay by cash, card or mobile
  stock <id> <delta>          receive (+) or write off (-) stock
  delete <id>                 delete a product
  inventory                   low stock and expiry report
  sales                       sales history
  revenue                     revenue totals
  export [path]               sales CSV (printed when no path)
  receipt <sale_id> <path>    save a sale's PDF receipt
  quit                        leave the till";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Search(String),
    Show(String),
    Add { product_id: String, quantity: Option<i64> },
    Quantity { product_id: String, quantity: i64 },
    Remove(String),
    Cart,
    Clear,
    Checkout { payment: String, customer: String },
    Stock { product_id: String, delta: i64 },
    Delete(String),
    Inventory,
    Sales,
    Revenue,
    Export(Option<PathBuf>),
    Receipt { sale_id: String, path: PathBuf },
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        let rest: Vec<&str> = words.collect();

        let arg = |i: usize, name: &str| {
            rest.get(i)
                .map(|s| s.to_string())
                .ok_or_else(|| format!("missing <{}>", name))
        };
        let number = |i: usize, name: &str| {
            arg(i, name)?
                .parse::<i64>()
                .map_err(|_| format!("<{}> must be a whole number", name))
        };

        let command = match verb.to_lowercase().as_str() {
            "help" | "?" => ConsoleCommand::Help,
            "search" | "s" => ConsoleCommand::Search(rest.join(" ")),
            "show" => ConsoleCommand::Show(arg(0, "id")?),
            "add" | "a" => ConsoleCommand::Add {
                product_id: arg(0, "id")?,
                quantity: if rest.len() > 1 { Some(number(1, "qty")?) } else { None },
            },
            "qty" => ConsoleCommand::Quantity {
                product_id: arg(0, "id")?,
                quantity: number(1, "qty")?,
            },
            "remove" | "rm" => ConsoleCommand::Remove(arg(0, "id")?),
            "cart" => ConsoleCommand::Cart,
            "clear" => ConsoleCommand::Clear,
            "checkout" | "pay" => ConsoleCommand::Checkout {
                payment: arg(0, "payment")?,
                customer: rest.get(1..).map(|w| w.join(" ")).unwrap_or_default(),
            },
            "stock" => ConsoleCommand::Stock {
                product_id: arg(0, "id")?,
                delta: number(1, "delta")?,
            },
            "delete" => ConsoleCommand::Delete(arg(0, "id")?),
            "inventory" | "inv" => ConsoleCommand::Inventory,
            "sales" => ConsoleCommand::Sales,
            "revenue" => ConsoleCommand::Revenue,
            "export" => ConsoleCommand::Export(rest.first().map(PathBuf::from)),
            "receipt" => ConsoleCommand::Receipt {
                sale_id: arg(0, "sale_id")?,
                path: PathBuf::from(arg(1, "path")?),
            },
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

/// Reads commands from `input` until EOF or `quit`, writing replies to
/// `output`.
pub async fn run_console<R, W>(session: &Session, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let banner = format!(
        "{} till ready. Type 'help' for commands.\n",
        session.till().config().store.name
    );
    output.write_all(banner.as_bytes()).await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match line.parse::<ConsoleCommand>() {
            Ok(ConsoleCommand::Quit) => break,
            Ok(command) => {
                debug!(session_id = %session.id(), ?command, "Console command");
                match execute(session, command).await {
                    Ok(text) => text,
                    Err(e) => format!("error [{:?}]: {}", e.code, e.message),
                }
            }
            Err(message) => format!("error: {}", message),
        };

        output.write_all(reply.as_bytes()).await?;
        if !reply.ends_with('\n') {
            output.write_all(b"\n").await?;
        }
    }

    output.write_all(b"\n").await?;
    output.flush().await
}

async fn execute(session: &Session, command: ConsoleCommand) -> Result<String, ApiError> {
    let till = session.till();
    let currency = &till.config().currency;

    let text = match command {
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Search(query) => {
            let products = product::search_catalog(till, query).await?;
            if products.is_empty() {
                "No products found.".to_string()
            } else {
                products
                    .iter()
                    .map(|p| product_line(p, currency))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ConsoleCommand::Show(id) => {
            let product = product::get_product(till, id).await?;
            serde_json::to_string_pretty(&product).map_err(|e| ApiError::internal(e.to_string()))?
        }
        ConsoleCommand::Add { product_id, quantity } => {
            cart_text(&cart::add_to_cart(session, product_id, quantity).await?, currency)
        }
        ConsoleCommand::Quantity { product_id, quantity } => cart_text(
            &cart::update_cart_quantity(session, product_id, quantity).await?,
            currency,
        ),
        ConsoleCommand::Remove(product_id) => {
            let response = cart::remove_from_cart(session, product_id.clone()).await?;
            match response.removed {
                Some(_) => cart_text(&response.cart, currency),
                None => format!("{} is not in the cart.", product_id),
            }
        }
        ConsoleCommand::Cart => cart_text(&cart::get_cart(session).await?, currency),
        ConsoleCommand::Clear => cart_text(&cart::clear_cart(session).await?, currency),
        ConsoleCommand::Checkout { payment, customer } => {
            let done = sale::checkout(session, customer, payment).await?;
            let receipt = match (&done.receipt_path, &done.receipt_error) {
                (Some(path), _) => format!("Receipt saved to {}", path.display()),
                (None, Some(error)) => format!("Receipt not saved: {}", error),
                (None, None) => "Receipt not saved.".to_string(),
            };
            format!("{}\n\n{}", done.summary, receipt)
        }
        ConsoleCommand::Stock { product_id, delta } => {
            let stock = product::adjust_stock(till, product_id.clone(), delta).await?;
            format!("{} now has {} in stock.", product_id, stock)
        }
        ConsoleCommand::Delete(id) => {
            let deleted = product::delete_product(till, id).await?;
            format!("Deleted {} ({}).", deleted.name, deleted.sku)
        }
        ConsoleCommand::Inventory => {
            let report = product::inventory_report(till).await?;
            let mut lines = vec![format!(
                "{} products, stock value {}",
                report.product_count,
                currency.format(Money::from_minor(report.stock_value))
            )];
            for (title, products) in [
                ("Low stock", &report.low_stock),
                ("Expiring soon", &report.expiring_soon),
                ("Expired", &report.expired),
            ] {
                lines.push(format!("\n{} ({}):", title, products.len()));
                lines.extend(products.iter().map(|p| product_line(p, currency)));
            }
            lines.join("\n")
        }
        ConsoleCommand::Sales => {
            let sales = report::list_sales(till).await?;
            if sales.is_empty() {
                "No sales yet.".to_string()
            } else {
                sales
                    .iter()
                    .map(|s| {
                        format!(
                            "{:<9} {}  {:<20} {:<13} {:>12}",
                            s.id(),
                            s.date_string(),
                            s.customer(),
                            s.payment().label(),
                            currency.format(s.total())
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ConsoleCommand::Revenue => {
            let revenue = report::total_revenue(till).await?;
            let mut lines = vec![format!(
                "Revenue: {} from {} sale(s)",
                revenue.formatted, revenue.sale_count
            )];
            lines.extend(revenue.by_payment.iter().map(|p| {
                format!("  {:<13} {}", p.label, currency.format(Money::from_minor(p.total)))
            }));
            lines.join("\n")
        }
        ConsoleCommand::Export(None) => report::export_sales_csv(till).await?,
        ConsoleCommand::Export(Some(path)) => {
            let path = report::write_sales_csv(till, path).await?;
            format!("Sales exported to {}", path.display())
        }
        ConsoleCommand::Receipt { sale_id, path } => {
            let bytes = sale::render_receipt_document(till, sale_id).await?;
            tokio::fs::write(&path, &bytes).await?;
            format!("Receipt written to {}", path.display())
        }
        ConsoleCommand::Quit => String::new(),
    };
    Ok(text)
}

fn product_line(p: &ProductDto, currency: &CurrencyFormat) -> String {
    format!(
        "{:<4} {:<8} {:<35} {:>12}  stock {:>4}{}",
        p.id,
        p.sku,
        p.name,
        currency.format(Money::from_minor(p.price)),
        p.stock,
        if p.low_stock { "  LOW" } else { "" }
    )
}

fn cart_text(response: &CartResponse, currency: &CurrencyFormat) -> String {
    if response.items.is_empty() {
        return "Cart is empty.".to_string();
    }

    let mut lines: Vec<String> = response
        .items
        .iter()
        .map(|line| {
            format!(
                "{:<4} {} x{} @ {} = {}",
                line.product_id,
                line.name,
                line.quantity,
                currency.format_amount(line.unit_price),
                currency.format_amount(line.line_total())
            )
        })
        .collect();
    for product_id in &response.over_stock {
        lines.push(format!("warning: {} quantity exceeds the stock on the shelf", product_id));
    }
    lines.push(format!("Subtotal: {}", currency.format(response.totals.subtotal)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Till, TillConfig};

    fn parse(line: &str) -> Result<ConsoleCommand, String> {
        line.parse()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("search knee brace"), Ok(ConsoleCommand::Search("knee brace".to_string())));
        assert_eq!(parse("search"), Ok(ConsoleCommand::Search(String::new())));
        assert_eq!(
            parse("add p1"),
            Ok(ConsoleCommand::Add {
                product_id: "p1".to_string(),
                quantity: None
            })
        );
        assert_eq!(
            parse("ADD p1 3"),
            Ok(ConsoleCommand::Add {
                product_id: "p1".to_string(),
                quantity: Some(3)
            })
        );
        assert_eq!(
            parse("checkout mobile Jane Wanjiru"),
            Ok(ConsoleCommand::Checkout {
                payment: "mobile".to_string(),
                customer: "Jane Wanjiru".to_string()
            })
        );
        assert_eq!(
            parse("pay cash"),
            Ok(ConsoleCommand::Checkout {
                payment: "cash".to_string(),
                customer: String::new()
            })
        );
        assert_eq!(parse("export"), Ok(ConsoleCommand::Export(None)));
        assert_eq!(parse("q"), Ok(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("add"), Err("missing <id>".to_string()));
        assert_eq!(parse("qty p1 many"), Err("<qty> must be a whole number".to_string()));
        assert!(parse("frobnicate").unwrap_err().contains("unknown command"));
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let dir = tempfile::tempdir().unwrap();
        let till = Till::new(TillConfig {
            receipt_dir: Some(dir.path().to_path_buf()),
            ..TillConfig::default()
        })
        .unwrap();
        let session = till.open_session();

        let script = b"search knee\nadd p1 2\n\ncheckout cash Jane\nsales\nadd p404\nfrobnicate\nquit\nadd p1 1\n";
        let mut output = Vec::new();
        run_console(&session, &script[..], &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Orthopedic Knee Brace"));
        assert!(output.contains("Subtotal: KES 5,000"));
        assert!(output.contains("Total: KES 5,000"));
        assert!(output.contains("Receipt saved to"));
        assert!(output.contains("sale_1"));
        assert!(output.contains("error [NotFound]: Product not found: p404"));
        assert!(output.contains("unknown command 'frobnicate'"));

        // Nothing after `quit` runs.
        assert!(till.with_store(|s| s.cart(session.cart_id()).unwrap().is_empty()));
        assert_eq!(till.with_store(|s| s.catalog().get("p1").unwrap().stock), 8);
    }
}
