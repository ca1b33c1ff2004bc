use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Dashboard-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events raised by the record store and the pass coordinator
pub mod events {
    use super::Event;

    /// The record store was loaded and the first frame published
    #[derive(Debug, Clone, PartialEq)]
    pub struct StoreLoaded {
        pub records: usize,
        pub dimensions: Vec<String>,
    }

    /// A filter dimension changed
    #[derive(Debug, Clone, PartialEq)]
    pub struct FiltersChanged {
        pub revision: u64,
        pub key: String,
        pub active_filters: usize,
    }

    /// Every filter was cleared
    #[derive(Debug, Clone, PartialEq)]
    pub struct FiltersReset {
        pub revision: u64,
    }

    /// A new frame replaced the displayed one
    #[derive(Debug, Clone, PartialEq)]
    pub struct FramePublished {
        pub revision: u64,
        pub records: usize,
        pub clusters: usize,
    }

    /// A pass failed; the previous frame stays displayed
    #[derive(Debug, Clone, PartialEq)]
    pub struct PassFailed {
        pub revision: u64,
        pub error: String,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(StoreLoaded, FiltersChanged, FiltersReset, FramePublished, PassFailed);
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn subscribe_fn<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event to every handler of its type.
    ///
    /// Handlers run under the bus lock and must not publish themselves.
    pub fn publish<E: Event>(&self, event: E) {
        let mut handlers = self.handlers.lock();
        if let Some(event_handlers) = handlers.get_mut(&TypeId::of::<E>()) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter turning a closure into an [`EventHandler`]
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
