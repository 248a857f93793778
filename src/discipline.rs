//! Order discipline: the execution rule applied to an incoming order.

use std::fmt;

/// How an order executes against the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Discipline {
    /// Executes only at or better than its stated price; rests if not
    /// fully filled.
    #[default]
    Limit,

    /// Executes against any opposing liquidity regardless of price.
    /// Unfilled residual is discarded, never rests.
    Market,

    /// Immediate-or-cancel: executes whatever is immediately fillable,
    /// then discards the residual. Never rests.
    Ioc,

    /// Inert until a best-of-book trigger is met, then promoted to a
    /// market order. Routed through the stop scheduler, never directly
    /// through order admission.
    Stop,
}

impl Discipline {
    /// Returns true if the discipline matches synchronously at admission
    /// and discards any residual.
    #[inline]
    pub fn is_immediate(self) -> bool {
        matches!(self, Discipline::Market | Discipline::Ioc)
    }

    /// Returns true if the price-cross check is skipped during matching.
    #[inline]
    pub fn ignores_price(self) -> bool {
        matches!(self, Discipline::Market | Discipline::Ioc)
    }

    /// Returns true if an unfilled remainder may rest on the book.
    #[inline]
    pub fn can_rest(self) -> bool {
        matches!(self, Discipline::Limit)
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discipline::Limit => write!(f, "LIMIT"),
            Discipline::Market => write!(f, "MARKET"),
            Discipline::Ioc => write!(f, "IOC"),
            Discipline::Stop => write!(f, "STOP"),
        }
    }
}
