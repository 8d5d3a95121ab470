//! Monotonic time source

/// Millisecond clock polled once per refresh
///
/// The counter is allowed to wrap; consumers use wrapping arithmetic.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
