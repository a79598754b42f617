//! Completed orders.

use crate::model::{CheckoutDetails, LineItem, Price, UserId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Process-wide order number, counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderNumber(pub u64);

impl Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable snapshot taken when a checkout is confirmed.
///
/// The same rendering is shown to the buyer and forwarded to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub number: OrderNumber,
    pub user_id: UserId,
    pub lines: Vec<LineItem>,
    pub total: Price,
    pub details: CheckoutDetails,
}

impl Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order {} placed!", self.number)?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "• {} × {} — {}", line.name, line.quantity, line.line_total)?;
        }
        writeln!(f)?;
        writeln!(f, "Total due: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "Name: {}", self.details.name)?;
        writeln!(f, "Phone: {}", self.details.phone)?;
        writeln!(f, "Delivery: {}", self.details.delivery)?;
        writeln!(f, "Address: {}", self.details.address)?;
        write!(f, "Customer: {}", self.user_id)
    }
}
