//! Display-order data model

mod order_list;
mod scope;

pub use order_list::{CategoryName, OrderList};
pub use scope::{Scope, UnknownScope};
