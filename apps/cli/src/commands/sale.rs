//! # Sale Actions
//!
//! ## Record Sale Flow
//! ```text
//! store ─► employee (of that store) ─► product + quantity ─┐
//!                                          ▲               │ stock pre-check
//!                                          └── another? ◄──┘
//!                                                   │
//!                                                   ▼
//!                        payment menu ─► SaleRepository::record (one DB transaction)
//!                                                   │
//!                                                   ▼
//!                              transaction ID + remaining stock
//! ```
//!
//! The pre-check only keeps obviously bad lines out of the basket. The
//! authoritative check runs again inside the database transaction, which
//! rolls back on any failure.

use std::io::{BufRead, Write};

use cvs_core::{PaymentMethod, SaleBasket};
use cvs_db::DbError;
use tracing::info;

use super::pickers::{pick_employee_by_id, pick_employee_by_index, pick_product, pick_store};
use crate::console::Console;
use crate::error::CliResult;
use crate::render;
use crate::AppContext;

pub async fn record_sale<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let Some(store) = pick_store(ctx, console).await? else {
        return Ok(());
    };
    let Some(employee) = pick_employee_by_id(ctx, console, &store).await? else {
        return Ok(());
    };

    let mut basket = SaleBasket::new(store.store_id, employee.employee_id);

    loop {
        if let Some(product) = pick_product(ctx, console, None).await? {
            let qty = console.prompt_quantity("Quantity: ")?;

            let on_hand = ctx
                .db
                .stock()
                .quantity_of(store.store_id, product.product_id)
                .await?;
            let wanted = basket.quantity_of(product.product_id) + qty;

            match on_hand {
                None => console.say(format!("{} is not stocked at {}.", product.name, store.name))?,
                Some(available) if available < wanted => console.say(format!(
                    "Only {} {} left at {}.",
                    available, product.name, store.name
                ))?,
                Some(_) => match basket.add(&product, qty) {
                    Ok(()) => console.say(format!("Added {} x{}.", product.name, qty))?,
                    Err(e) => console.say(e.to_string())?,
                },
            }
        }

        if !console.confirm("Add another product? (y/n): ")? {
            break;
        }
    }

    if basket.is_empty() {
        return console.say("Basket is empty; no sale recorded.");
    }

    console.say(render::basket(&basket, &ctx.currency))?;
    console.say("Payment method: 1. Cash  2. Card  3. Mobile Payment")?;
    let choice = console.prompt_line("Select: ")?;
    let method = match PaymentMethod::from_menu_choice(&choice) {
        Some(method) => method,
        None => {
            let fallback = PaymentMethod::default();
            console.say(format!("Unknown payment choice; using {fallback}."))?;
            fallback
        }
    };
    basket.set_payment_method(method);

    let outcome = ctx.db.sales().record(&basket).await?;
    info!(
        transaction_id = outcome.transaction_id,
        store_id = store.store_id,
        "Sale recorded from menu"
    );

    console.say(render::sale_outcome(&outcome))
}

/// store ─► employee ─► that employee's sales ─► receipt.
pub async fn sale_receipt<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let Some(store) = pick_store(ctx, console).await? else {
        return Ok(());
    };
    let Some(employee) = pick_employee_by_index(ctx, console, &store).await? else {
        return Ok(());
    };

    let sales = ctx.db.sales().list_for_employee(employee.employee_id).await?;
    if sales.is_empty() {
        return console.say(format!("No sales found for {}.", employee.name));
    }

    console.say(render::sale_list(&sales, &ctx.currency))?;
    let sale = console.select_by_index("Transaction number: ", &sales)?;

    let receipt = ctx
        .db
        .sales()
        .receipt(sale.transaction_id)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", sale.transaction_id))?;
    let lines = ctx.db.sales().receipt_lines(sale.transaction_id).await?;

    console.say(render::sale_receipt(&receipt, &lines, &ctx.currency))
}
