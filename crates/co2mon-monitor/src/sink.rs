use std::sync::Arc;

use co2mon_frame::Reading;

/// Receives every reading the acquisition loop produces.
///
/// Called on the acquisition thread; implementations must not block.
pub trait ReadingSink {
    fn publish(&self, reading: &Reading);
}

impl<S: ReadingSink + ?Sized> ReadingSink for &S {
    fn publish(&self, reading: &Reading) {
        (**self).publish(reading)
    }
}

impl<S: ReadingSink + ?Sized> ReadingSink for Arc<S> {
    fn publish(&self, reading: &Reading) {
        (**self).publish(reading)
    }
}
