//! # Pickers
//!
//! The search-then-select steps shared by the menu actions:
//!
//! ```text
//! keyword ──► LIKE search ──► list ──► pick (by ID or by number)
//!                 │
//!                 └── no rows ──► "No … found." ──► None
//! ```
//!
//! A `None` return means nothing matched and the message has already been
//! printed; the caller just goes back to the menu.

use std::io::{BufRead, Write};

use cvs_core::{Employee, Product, Store, Supplier};

use crate::console::Console;
use crate::error::CliResult;
use crate::render;
use crate::AppContext;

/// A listing as long as the search limit may have been cut short.
fn note_truncation<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    shown: usize,
) -> CliResult<()> {
    if shown >= ctx.search_limit as usize {
        console.say(render::truncation_notice(ctx.search_limit))?;
    }
    Ok(())
}

/// Store name search, then pick by store ID.
pub async fn pick_store<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<Option<Store>> {
    let keyword = console.prompt_line("Store name (blank for all): ")?;
    let stores = ctx
        .db
        .stores()
        .search_by_name(&keyword, ctx.search_limit)
        .await?;

    if stores.is_empty() {
        console.say("No stores found.")?;
        return Ok(None);
    }

    console.say(render::store_list(&stores))?;
    note_truncation(ctx, console, stores.len())?;
    let store = console.select_by_id("Store ID: ", &stores, |s| s.store_id)?;
    Ok(Some(store.clone()))
}

/// Supplier name search, then pick by list number.
pub async fn pick_supplier<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<Option<Supplier>> {
    let keyword = console.prompt_line("Supplier name (blank for all): ")?;
    let suppliers = ctx
        .db
        .suppliers()
        .search_by_name(&keyword, ctx.search_limit)
        .await?;

    if suppliers.is_empty() {
        console.say("No suppliers found.")?;
        return Ok(None);
    }

    console.say(render::supplier_list(&suppliers))?;
    note_truncation(ctx, console, suppliers.len())?;
    let supplier = console.select_by_index("Supplier number: ", &suppliers)?;
    Ok(Some(supplier.clone()))
}

async fn search_employees<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    store: &Store,
) -> CliResult<Vec<Employee>> {
    let keyword = console.prompt_line("Employee name (blank for all): ")?;
    let employees = ctx
        .db
        .employees()
        .search_in_store(store.store_id, &keyword, ctx.search_limit)
        .await?;

    if employees.is_empty() {
        console.say(format!("No employees found at {}.", store.name))?;
    }
    Ok(employees)
}

/// Employee search within `store`, then pick by employee ID.
pub async fn pick_employee_by_id<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    store: &Store,
) -> CliResult<Option<Employee>> {
    let employees = search_employees(ctx, console, store).await?;
    if employees.is_empty() {
        return Ok(None);
    }

    console.say(render::employee_list(&employees))?;
    note_truncation(ctx, console, employees.len())?;
    let employee = console.select_by_id("Employee ID: ", &employees, |e| e.employee_id)?;
    Ok(Some(employee.clone()))
}

/// Employee search within `store`, then pick by list number.
pub async fn pick_employee_by_index<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    store: &Store,
) -> CliResult<Option<Employee>> {
    let employees = search_employees(ctx, console, store).await?;
    if employees.is_empty() {
        return Ok(None);
    }

    console.say(render::numbered_employee_list(&employees))?;
    note_truncation(ctx, console, employees.len())?;
    let employee = console.select_by_index("Employee number: ", &employees)?;
    Ok(Some(employee.clone()))
}

/// Product name search, optionally limited to one supplier, then pick by
/// product ID.
pub async fn pick_product<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    supplier_id: Option<i64>,
) -> CliResult<Option<Product>> {
    let keyword = console.prompt_line("Product name (blank for all): ")?;
    let products = ctx.db.products();
    let products = match supplier_id {
        Some(supplier_id) => {
            products
                .search_for_supplier(supplier_id, &keyword, ctx.search_limit)
                .await?
        }
        None => products.search_by_name(&keyword, ctx.search_limit).await?,
    };

    if products.is_empty() {
        console.say("No products found.")?;
        return Ok(None);
    }

    console.say(render::product_list(&products, &ctx.currency))?;
    note_truncation(ctx, console, products.len())?;
    let product = console.select_by_id("Product ID: ", &products, |p| p.product_id)?;
    Ok(Some(product.clone()))
}
