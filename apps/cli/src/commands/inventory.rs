use std::io::{BufRead, Write};

use super::pickers::pick_store;
use crate::console::Console;
use crate::error::CliResult;
use crate::render;
use crate::AppContext;

/// Prints a store's stock, one product per line.
pub async fn store_inventory<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let Some(store) = pick_store(ctx, console).await? else {
        return Ok(());
    };

    let rows = ctx.db.stock().list_for_store(store.store_id).await?;
    if rows.is_empty() {
        return console.say(format!("No stock recorded for {}.", store.name));
    }

    console.say(render::inventory_table(&store, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{output, scripted, seeded_context};

    #[tokio::test]
    async fn test_store_inventory_sorted_by_product() {
        let ctx = seeded_context().await;
        let mut console = scripted("Jamsil\n3\n");

        store_inventory(&ctx, &mut console).await.unwrap();

        let out = output(console);
        assert!(out.contains("product | category | quantity | last updated"));
        let rows: Vec<&str> = out
            .lines()
            .filter(|l| l.matches(" | ").count() == 3 && !l.starts_with("product"))
            .collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("Banana Milk | Dairy |"));
        assert!(rows[3].starts_with("Saeukkang | Snacks | 15 |"));
    }

    #[tokio::test]
    async fn test_store_without_stock() {
        let ctx = seeded_context().await;
        ctx.db
            .stores()
            .insert(&cvs_core::NewStore {
                name: "emart24 Mapo".to_string(),
                address: None,
                phone: None,
            })
            .await
            .unwrap();
        let mut console = scripted("emart24\n4\n");

        store_inventory(&ctx, &mut console).await.unwrap();
        assert!(output(console).contains("No stock recorded for emart24 Mapo."));
    }
}
