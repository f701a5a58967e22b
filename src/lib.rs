//! # Boxoffice - Event Ticketing Backend
//!
//! This crate provides a small ticketing backend: events live in a SQLite
//! store, and a pure pricing engine computes the revenue-maximizing uniform
//! clearing price for a set of bids against an event's remaining inventory.
//!
//! ## Architecture
//!
//! The backend consists of a few small components:
//! - **Pricing**: The uniform-price allocation engine, a pure function
//! - **Store**: SQLite persistence for events (sqlx)
//! - **API**: axum routes for create/list/price plus metrics exposition
//! - **Metrics**: Atomic counters exported in Prometheus text format
//!
//! ## Example
//!
//! ```rust
//! use boxoffice::pricing::{self, Allocation, Inventory};
//!
//! // Three bids against three remaining tickets.
//! let inv = Inventory { capacity: 3, sold: 0 };
//! let alloc = pricing::quote(&[10.0, 20.0, 30.0], inv);
//!
//! match alloc {
//!     Allocation::Sale { price, quantity, revenue } => {
//!         assert_eq!(price, 20.0);
//!         assert_eq!(quantity, 2);
//!         assert_eq!(revenue, 40.0);
//!     }
//!     Allocation::SoldOut => unreachable!(),
//! }
//! ```
pub mod api;
pub mod metrics;
pub mod pricing;
pub mod store;
