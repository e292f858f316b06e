//! # cvs-core: Domain Logic for the Store-Chain POS
//!
//! Pure types and rules shared by the database layer and the CLI. Nothing in
//! this crate touches the database, the console or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CVS Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`cvs`)                             │   │
//! │  │    menu ──► prompt ──► search/select ──► render receipt         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ cvs-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ validation│  │   │
//! │  │   │  Order    │  │   Money   │  │OrderDraft │  │  rules    │  │   │
//! │  │   │  Sale     │  │ Currency  │  │ SaleBasket│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cvs-db (Database Layer)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and report rows (Store, Product, Order, Sale, ...)
//! - [`money`] - Integer money and currency formatting
//! - [`draft`] - Order drafts and sale baskets built up at the prompt
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cvs_core::money::{Currency, Money};
//!
//! let price = Money::from_minor(1_200);
//! let line = price.multiply_quantity(3);
//!
//! assert_eq!(Currency::krw().format(line), "₩3,600");
//! ```

pub mod draft;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use draft::{OrderDraft, SaleBasket};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money};
pub use types::*;

/// Maximum number of distinct products on one order or sale.
pub const MAX_LINES: usize = 50;

/// Maximum quantity on a single order or sale line.
///
/// Catches slips like typing 10000 instead of 100 at the prompt.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum length of a LIKE search keyword.
pub const MAX_KEYWORD_LEN: usize = 100;
