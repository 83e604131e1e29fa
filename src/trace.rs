//! Trace events for transitions that discard a held value. Without the `tracing` feature these
//! compile to nothing.

#[inline]
pub(crate) fn construction_failed<T>() {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "optional",
        type_name = core::any::type_name::<T>(),
        "construction failed after the previous value was dropped; optional left disengaged"
    );
}

#[inline]
pub(crate) fn value_reset<T>() {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "optional",
        type_name = core::any::type_name::<T>(),
        "dropping held value"
    );
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use crate::Optional;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tracing::{span, Event, Metadata, Subscriber};

    /// Counts events emitted under the `optional` target.
    struct EventCounter(Arc<AtomicUsize>);

    impl Subscriber for EventCounter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            if event.metadata().target() == "optional" {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    #[test]
    fn events_only_on_discarded_values() {
        let events = Arc::new(AtomicUsize::new(0));
        tracing::subscriber::with_default(EventCounter(Arc::clone(&events)), || {
            let mut slot = Optional::<u16>::new();
            slot.emplace(1_u16);
            assert_eq!(0, events.load(Ordering::SeqCst));

            slot.emplace(2_u16);
            assert_eq!(1, events.load(Ordering::SeqCst));

            assert!(slot.try_emplace_with(|| "x".parse::<u16>()).is_err());
            assert_eq!(3, events.load(Ordering::SeqCst));
            assert!(!slot.has_value());
        });
    }
}
