//! Sale fixtures shared by the unit tests in this crate.

use chrono::Utc;
use duka_core::{Cart, Money, NewProduct, PaymentMethod, Product, Sale, WALK_IN_CUSTOMER};

/// Builds `sale_7` for "Jane" paying by mobile money from `(name, price, qty)` items.
pub(crate) fn sale_with(items: &[(&str, i64, i64)]) -> Sale {
    let mut cart = Cart::new();
    for (i, (name, price, qty)) in items.iter().enumerate() {
        let product = Product::from_new(
            format!("p{}", i + 1),
            NewProduct::new(format!("{}", 1001 + i), *name, Money::from_minor(*price), 100),
            Utc::now(),
        );
        cart.add_line(&product, *qty).unwrap();
    }
    Sale::from_cart_lines(
        "sale_7",
        cart.lines(),
        "Jane",
        WALK_IN_CUSTOMER,
        PaymentMethod::MobileMoney,
        Utc::now(),
    )
    .unwrap()
}
