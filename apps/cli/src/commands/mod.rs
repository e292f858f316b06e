//! Menu actions.
//!
//! Each action takes the shared [`AppContext`](crate::AppContext) and the
//! console, prompts for what it needs, runs its queries through `cvs-db`
//! and prints the result. Errors go back to the menu loop.

pub mod inventory;
pub mod order;
pub mod pickers;
pub mod report;
pub mod sale;
