use std::time::Duration;

/// Something advanced by a fixed-interval clock.
pub trait Tick {
    fn tick(&mut self, interval: Duration);
}

/// Drives `target` through `n` ticks without waiting on a real clock.
pub fn tick_n<T: Tick + ?Sized>(target: &mut T, interval: Duration, n: usize) {
    for _ in 0..n {
        target.tick(interval);
    }
}
