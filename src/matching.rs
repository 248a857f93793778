//! Matching: the synchronous price-time priority execution loop.
//!
//! 1. Better prices match first (higher bids, lower asks)
//! 2. At the same price, earlier orders match first (FIFO)
//! 3. Trades execute at the resting order's price

use log::warn;

use crate::{Book, Order, Price, Side, Trade, TradeSink};

/// Does an incoming price cross a resting price?
///
/// - Buy crosses if `taker_price >= resting_price`
/// - Sell crosses if `taker_price <= resting_price`
#[inline]
fn prices_cross(taker_side: Side, taker_price: Price, resting_price: Price) -> bool {
    match taker_side {
        Side::Buy => taker_price >= resting_price,
        Side::Sell => taker_price <= resting_price,
    }
}

impl Book {
    /// Match `taker` against the opposing side until its residual is
    /// exhausted, the opposing side is empty, or (Limit only) prices stop
    /// crossing. Market and IOC skip the price check entirely.
    ///
    /// Each iteration fills against the head of the best opposing level,
    /// emits one trade at the resting price, and evicts the resting order
    /// the instant its residual reaches zero. `taker` is mutated in place;
    /// the caller decides what its remainder means — resting Limit takers
    /// are written back (or evicted when filled) by the worker sweep,
    /// Market/IOC remainders are discarded.
    pub(crate) fn execute(&mut self, taker: &mut Order, sink: &dyn TradeSink) {
        loop {
            if taker.quantity == 0 {
                break;
            }

            let best = match self.opposite(taker.side).best_price() {
                Some(p) => p,
                None => break, // no liquidity
            };

            if !taker.discipline.ignores_price()
                && !prices_cross(taker.side, taker.price, best)
            {
                break; // no cross
            }

            let resting_id = match self.opposite(taker.side).best_front() {
                Some(id) => id,
                None => break,
            };

            let resting_quantity = match self.order(resting_id) {
                Some(o) => o.quantity,
                None => {
                    // Level head with no index entry; drop it and keep going.
                    warn!("dropping orphaned head {} at {}", resting_id, best);
                    self.opposite_mut(taker.side).pop_best_front();
                    continue;
                }
            };

            if resting_quantity == 0 {
                warn!("evicting zero-residual head {} at {}", resting_id, best);
                self.remove(resting_id);
                continue;
            }

            let trade_quantity = taker.quantity.min(resting_quantity);
            if trade_quantity == 0 {
                break;
            }

            let (buyer, seller) = match taker.side {
                Side::Buy => (taker.id, resting_id),
                Side::Sell => (resting_id, taker.id),
            };
            sink.on_trade(&Trade {
                buyer,
                seller,
                quantity: trade_quantity,
                price: best,
            });

            taker.fill(trade_quantity);

            let resting_filled = {
                let resting = self
                    .order_mut(resting_id)
                    .expect("resting order present in index");
                resting.fill(trade_quantity);
                resting.is_filled()
            };
            if resting_filled {
                self.remove(resting_id);
            }
        }
    }
}
