//! # Menu Loop
//!
//! ```text
//! ┌──────────────┐   choice    ┌──────────────┐   CliResult   ┌────────────┐
//! │ print menu   │ ──────────► │  dispatch    │ ────────────► │ report err │
//! └──────┬───────┘             └──────────────┘               └─────┬──────┘
//!        ▲                                                          │
//!        └──────────────────────────────────────────────────────────┘
//!                 until Quit, end of input, or an I/O failure
//! ```

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::commands::{inventory, order, report, sale};
use crate::console::Console;
use crate::error::{CliError, CliResult};
use crate::AppContext;

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    PlaceOrder,
    OrderReceipt,
    StoreInventory,
    ReceiveDeliveries,
    RecordSale,
    SaleReceipt,
    TopSellers,
    Quit,
    UpdateOrderStatus,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        MenuAction::PlaceOrder,
        MenuAction::OrderReceipt,
        MenuAction::StoreInventory,
        MenuAction::ReceiveDeliveries,
        MenuAction::RecordSale,
        MenuAction::SaleReceipt,
        MenuAction::TopSellers,
        MenuAction::Quit,
        MenuAction::UpdateOrderStatus,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|a| a == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::PlaceOrder => "Place a supplier order",
            MenuAction::OrderReceipt => "Order receipt",
            MenuAction::StoreInventory => "Store inventory",
            MenuAction::ReceiveDeliveries => "Receive delivered orders into stock",
            MenuAction::RecordSale => "Record a sale",
            MenuAction::SaleReceipt => "Sale receipt",
            MenuAction::TopSellers => "Top sellers of the month",
            MenuAction::Quit => "Quit",
            MenuAction::UpdateOrderStatus => "Update order status",
        }
    }
}

pub fn menu_text() -> String {
    let mut out = String::from("\n===== CVS Menu =====\n");
    for action in MenuAction::ALL {
        out.push_str(&format!("{}. {}\n", action.number(), action.label()));
    }
    out
}

/// Runs the menu until Quit or end of input.
///
/// Failed actions print their message and return to the menu; only I/O
/// failures on the console itself end the loop with an error.
pub async fn run_menu<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    loop {
        console.say(menu_text())?;

        let choice = match console.prompt_line("Select: ") {
            Ok(choice) => choice,
            Err(CliError::InputClosed) => break,
            Err(e) => return Err(e),
        };

        let Some(action) = MenuAction::parse(&choice) else {
            console.say("Invalid choice.")?;
            continue;
        };

        if action == MenuAction::Quit {
            break;
        }

        debug!(?action, "Menu action selected");

        match dispatch(ctx, console, action).await {
            Ok(()) => {}
            Err(CliError::InputClosed) => break,
            Err(e) if e.is_recoverable() => {
                warn!(code = ?e.code(), "Menu action failed: {}", e);
                console.say(format!("Error: {}", e.user_message()))?;
            }
            Err(e) => return Err(e),
        }
    }

    console.say("Goodbye.")?;
    Ok(())
}

async fn dispatch<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
    action: MenuAction,
) -> CliResult<()> {
    match action {
        MenuAction::PlaceOrder => order::place_order(ctx, console).await,
        MenuAction::OrderReceipt => order::order_receipt(ctx, console).await,
        MenuAction::StoreInventory => inventory::store_inventory(ctx, console).await,
        MenuAction::ReceiveDeliveries => order::receive_deliveries(ctx, console).await,
        MenuAction::RecordSale => sale::record_sale(ctx, console).await,
        MenuAction::SaleReceipt => sale::sale_receipt(ctx, console).await,
        MenuAction::TopSellers => report::top_sellers(ctx, console).await,
        MenuAction::UpdateOrderStatus => order::update_order_status(ctx, console).await,
        MenuAction::Quit => Ok(()),
    }
}
