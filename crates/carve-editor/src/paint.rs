//! Paint cycle
//!
//! Geometry is only meaningful once the renderer has caught up with a
//! mutation. Handlers await [`PaintCycle::after_next_paint`] before measuring.

use std::future::Future;
use std::pin::Pin;

/// Settle point between a DOM mutation and the next measurement
pub trait PaintCycle {
    fn after_next_paint(&self) -> Pin<Box<dyn Future<Output = ()> + '_>>;
}

/// Yields once to the executor
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldingPaint;

impl PaintCycle for YieldingPaint {
    fn after_next_paint(&self) -> Pin<Box<dyn Future<Output = ()> + '_>> {
        Box::pin(smol::future::yield_now())
    }
}
