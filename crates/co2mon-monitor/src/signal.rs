//! Stop signals checked by the acquisition loop between frame reads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something the acquisition loop polls before each read.
pub trait StopSignal {
    fn should_stop(&self) -> bool;
}

/// A signal that never fires; the loop runs until an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl StopSignal for Never {
    fn should_stop(&self) -> bool {
        false
    }
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<T: StopSignal + ?Sized> StopSignal for &T {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

impl<T: StopSignal + ?Sized> StopSignal for Arc<T> {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

#[cfg(feature = "async")]
impl StopSignal for tokio_util::sync::CancellationToken {
    fn should_stop(&self) -> bool {
        self.is_cancelled()
    }
}
