//! Bounded ticket pool shared by the vendor and the customer.
//!
//! The pool holds fungible ticket units up to a fixed capacity. Every
//! mutation runs inside one critical section, which is the only point of
//! synchronization between the two agents.
//!
//! # Example
//!
//! ```ignore
//! use ticketing_core::pool::{BoundedTicketPool, TicketPool};
//!
//! let pool = BoundedTicketPool::new(2);
//! pool.add()?;
//! assert_eq!(pool.size(), 1);
//! assert_eq!(pool.remove_if_available(), Some(0));
//! assert_eq!(pool.remove_if_available(), None);
//! ```

mod bounded;
mod error;
mod traits;

pub use bounded::BoundedTicketPool;
pub use error::PoolError;
pub use traits::TicketPool;
