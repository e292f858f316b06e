//! Supplier order actions: place, print a receipt, receive deliveries and
//! move an order through its lifecycle.

use std::io::{BufRead, Write};

use cvs_core::OrderDraft;
use cvs_db::DbError;
use tracing::info;

use super::pickers::{pick_product, pick_store, pick_supplier};
use crate::console::Console;
use crate::error::CliResult;
use crate::render;
use crate::AppContext;

/// Builds an order for one store line by line and places it.
///
/// The first product fixes the supplier; later searches only list that
/// supplier's products.
pub async fn place_order<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let Some(store) = pick_store(ctx, console).await? else {
        return Ok(());
    };

    let mut draft = OrderDraft::new(store.store_id);

    loop {
        if let Some(product) = pick_product(ctx, console, draft.supplier_id()).await? {
            let qty = console.prompt_quantity("Quantity: ")?;
            match draft.add(&product, qty) {
                Ok(()) => console.say(format!("Added {} x{}.", product.name, qty))?,
                Err(e) => console.say(e.to_string())?,
            }
        }

        if !console.confirm("Add another product? (y/n): ")? {
            break;
        }
    }

    if draft.is_empty() {
        console.say("Nothing to order.")?;
        return Ok(());
    }

    let order_id = ctx.db.orders().place(&draft).await?;
    info!(order_id, store_id = store.store_id, "Order placed from menu");

    console.say(format!(
        "Order placed (order ID {order_id}): {} unit(s) for {}.",
        draft.total_quantity(),
        store.name
    ))
}

/// store ─► supplier ─► that pair's orders ─► receipt.
pub async fn order_receipt<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let Some(store) = pick_store(ctx, console).await? else {
        return Ok(());
    };
    let Some(supplier) = pick_supplier(ctx, console).await? else {
        return Ok(());
    };

    let orders = ctx
        .db
        .orders()
        .list_for_store_and_supplier(store.store_id, supplier.supplier_id)
        .await?;

    if orders.is_empty() {
        return console.say(format!(
            "No orders found from {} to {}.",
            supplier.name, store.name
        ));
    }

    console.say(render::order_list(&orders))?;
    let order = console.select_by_index("Order number: ", &orders)?;

    let receipt = ctx
        .db
        .orders()
        .receipt(order.order_id)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order.order_id))?;
    let lines = ctx.db.orders().receipt_lines(order.order_id).await?;

    console.say(render::order_receipt(&receipt, &lines, &ctx.currency))
}

/// Adds every delivered, not yet stocked order to its store's stock.
pub async fn receive_deliveries<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let report = ctx.db.orders().receive_deliveries().await?;
    console.say(render::delivery_report(&report))
}

pub async fn update_order_status<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let order_id = console.prompt_i64("Order ID: ")?;
    let order = ctx
        .db
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id))?;

    if order.status.is_terminal() {
        return console.say(format!(
            "Order {} is {} and can no longer change.",
            order_id, order.status
        ));
    }

    console.say(format!("Order {} is currently {}.", order_id, order.status))?;
    let choices = order.status.next_statuses();
    for (i, status) in choices.iter().enumerate() {
        console.say(format!("{}. {}", i + 1, status))?;
    }
    let next = *console.select_by_index("New status: ", choices)?;

    ctx.db.orders().update_status(order_id, next).await?;
    console.say(format!("Order {} is now {}.", order_id, next))
}
