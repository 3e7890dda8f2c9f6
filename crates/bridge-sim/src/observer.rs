//! Crossing observer trait for logging, output, and test instrumentation.

use std::sync::Arc;

use bridge_core::Vehicle;

use crate::Crossing;

/// Callbacks invoked by both engines at each vehicle transition.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Callbacks run while the arbiter's lock
/// is held, so the sequence of calls seen by an observer is a serialization
/// of the run.  Keep them short and never call back into the arbiter.
///
/// # Example — exclusion checker
///
/// ```rust,ignore
/// struct OnBridge(AtomicUsize);
///
/// impl CrossingObserver for OnBridge {
///     fn on_admit(&self, _c: &Crossing) {
///         assert_eq!(self.0.fetch_add(1, Ordering::SeqCst), 0);
///     }
///     fn on_exit(&self, _c: &Crossing) {
///         self.0.fetch_sub(1, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait CrossingObserver: Send + Sync {
    /// A vehicle joined its direction's wait queue.
    fn on_arrival(&self, _vehicle: &Vehicle) {}

    /// A vehicle was granted the bridge.
    fn on_admit(&self, _crossing: &Crossing) {}

    /// A vehicle left the bridge; its statistics are now recorded.
    fn on_exit(&self, _crossing: &Crossing) {}
}

/// A [`CrossingObserver`] that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl CrossingObserver for NoopObserver {}

impl<T: CrossingObserver + ?Sized> CrossingObserver for Arc<T> {
    fn on_arrival(&self, vehicle: &Vehicle) {
        (**self).on_arrival(vehicle)
    }

    fn on_admit(&self, crossing: &Crossing) {
        (**self).on_admit(crossing)
    }

    fn on_exit(&self, crossing: &Crossing) {
        (**self).on_exit(crossing)
    }
}

/// `None` observes nothing, so an observer can be switched on at runtime.
impl<T: CrossingObserver> CrossingObserver for Option<T> {
    fn on_arrival(&self, vehicle: &Vehicle) {
        if let Some(o) = self {
            o.on_arrival(vehicle)
        }
    }

    fn on_admit(&self, crossing: &Crossing) {
        if let Some(o) = self {
            o.on_admit(crossing)
        }
    }

    fn on_exit(&self, crossing: &Crossing) {
        if let Some(o) = self {
            o.on_exit(crossing)
        }
    }
}
