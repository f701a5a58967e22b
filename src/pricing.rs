// src/pricing.rs
//! Uniform-price ticket allocation.
//!
//! Given the bids collected for an event and a snapshot of its remaining
//! inventory, this module computes the single clearing price that maximizes
//! total revenue when every winning bidder pays that same price.
//!
//! ## How it works
//!
//! - **Demand trimming**: when bids outnumber remaining tickets, only the
//!   highest bidders stay eligible, whatever the final clearing price.
//! - **Greedy scan**: every retained bid is a candidate clearing price;
//!   pricing at the i-th lowest retained bid sells to everyone at or above
//!   it. The scan keeps the highest-revenue candidate.
//! - **Tie-break**: revenue ties keep the earlier (lower-price) candidate,
//!   selling to more buyers at a lower price. This is a business rule, not
//!   an accident of the scan order.
//!
//! ## Example
//!
//! ```rust
//! use boxoffice::pricing::{self, Allocation, Inventory};
//!
//! let inv = Inventory { capacity: 3, sold: 0 };
//! let alloc = pricing::quote(&[10.0, 20.0, 30.0], inv);
//!
//! // Two buyers at 20 beat three at 10 and one at 30.
//! assert_eq!(
//!     alloc,
//!     Allocation::Sale { price: 20.0, quantity: 2, revenue: 40.0 }
//! );
//! ```

/// Point-in-time ticket inventory for one event.
///
/// `sold >= capacity` is a valid input meaning nothing is left to sell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inventory {
    pub capacity: i64,
    pub sold: i64,
}

impl Inventory {
    #[inline]
    pub fn remaining(&self) -> i64 {
        self.capacity - self.sold
    }
}

/// Outcome of a pricing run.
///
/// `SoldOut` is distinct from a legitimate zero-price sale; it only appears
/// when there is no inventory left at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Allocation {
    SoldOut,
    Sale {
        price: f64,
        quantity: u64,
        revenue: f64,
    },
}

impl Allocation {
    #[inline]
    pub fn revenue(&self) -> f64 {
        match *self {
            Allocation::SoldOut => 0.0,
            Allocation::Sale { revenue, .. } => revenue,
        }
    }
}

/// Compute the revenue-maximizing uniform clearing price.
///
/// Total over its whole input domain: degenerate cases (sold-out event,
/// empty bid list, all-zero bids) come back as ordinary results, never as
/// errors. Deterministic for identical inputs.
pub fn quote(bids: &[f64], inv: Inventory) -> Allocation {
    let remaining = inv.remaining();
    if remaining <= 0 {
        return Allocation::SoldOut;
    }

    let mut prices = bids.to_vec();
    prices.sort_by(f64::total_cmp);

    // Scarcity rations tickets to the highest bidders: drop the lowest
    // bids until demand fits the remaining inventory.
    let keep = (remaining as usize).min(prices.len());
    let retained = &prices[prices.len() - keep..];

    if retained.is_empty() {
        return Allocation::Sale {
            price: 0.0,
            quantity: 0,
            revenue: 0.0,
        };
    }

    // Fallback: sell the whole retained set. Covers an all-zero bid set,
    // where no candidate has positive revenue.
    let mut best_quantity = retained.len();
    let mut best_revenue = 0.0_f64;

    for (i, &px) in retained.iter().enumerate() {
        // Pricing at retained[i] sells to every bidder at or above it.
        let quantity = retained.len() - i;
        let revenue = px * quantity as f64;

        // Strict improvement only: ties keep the lower price / larger sale.
        if revenue > best_revenue {
            best_revenue = revenue;
            best_quantity = quantity;
        }
    }

    // Derive the price from the winning revenue so the two never drift.
    Allocation::Sale {
        price: best_revenue / best_quantity as f64,
        quantity: best_quantity as u64,
        revenue: best_revenue,
    }
}

impl Allocation {
    pub fn assert_invariants(&self, bids: &[f64], inv: Inventory) {
        match *self {
            Allocation::SoldOut => {
                assert!(inv.remaining() <= 0, "sold out with inventory left");
            }
            Allocation::Sale {
                price,
                quantity,
                revenue,
            } => {
                assert!(inv.remaining() > 0, "sale on an exhausted event");
                assert!(
                    quantity <= inv.remaining() as u64,
                    "quantity {quantity} exceeds remaining {}",
                    inv.remaining()
                );
                assert!(
                    quantity <= bids.len() as u64,
                    "quantity {quantity} exceeds demand {}",
                    bids.len()
                );
                assert!(price >= 0.0, "negative clearing price {price}");
                assert!(revenue >= 0.0, "negative revenue {revenue}");

                let expected = price * quantity as f64;
                let tol = 1e-9 * revenue.abs().max(1.0);
                assert!(
                    (revenue - expected).abs() <= tol,
                    "revenue {revenue} != price*quantity {expected}"
                );
            }
        }
    }
}
