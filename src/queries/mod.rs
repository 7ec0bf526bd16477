//! Read-side query modules.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods
//! returning `Result<T>` with typed model payloads.

pub mod cards;
pub mod catalog;
pub mod prices;

pub use cards::{CardQuery, SearchCardsParams};
pub use catalog::CatalogQuery;
pub use prices::PriceQuery;
