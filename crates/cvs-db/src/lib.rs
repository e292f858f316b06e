//! # cvs-db: Database Layer
//!
//! SQLite persistence for the store-chain tool, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CVS Data Flow                                  │
//! │                                                                         │
//! │  Menu action (e.g. "5. Record sale")                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cvs-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ store/supplier │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ employee/stock │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │    │ product/order  │    │   _schema    │  │   │
//! │  │   │               │    │ sale/report    │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL, foreign keys on)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cvs_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cvs.db")).await?;
//! let stores = db.stores().search_by_name("GS", 50).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::employee::EmployeeRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::stock::StockRepository;
pub use repository::store::StoreRepository;
pub use repository::supplier::SupplierRepository;
