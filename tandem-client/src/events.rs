use crate::error::EngineError;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RemoteStream,
    Error,
    Disconnect,
}

#[derive(Debug, Clone)]
pub enum EngineEvent<S> {
    RemoteStream(S),
    Error(EngineError),
    Disconnect,
}

impl<S> EngineEvent<S> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RemoteStream(_) => EventKind::RemoteStream,
            Self::Error(_) => EventKind::Error,
            Self::Disconnect => EventKind::Disconnect,
        }
    }
}

type Handler<S> = Arc<dyn Fn(&EngineEvent<S>) + Send + Sync>;

/// One handler per event kind; registering again replaces the previous one.
pub struct EventRegistry<S> {
    handlers: DashMap<EventKind, Handler<S>>,
}

impl<S> EventRegistry<S> {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&EngineEvent<S>) + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
    }

    /// Returns whether a handler was registered.
    pub fn off(&self, kind: EventKind) -> bool {
        self.handlers.remove(&kind).is_some()
    }

    pub fn emit(&self, event: EngineEvent<S>) {
        // Clone out of the map so a handler may call `on`/`off`.
        let handler = self
            .handlers
            .get(&event.kind())
            .map(|entry| entry.value().clone());

        if let Some(handler) = handler {
            handler(&event);
        }
    }
}

impl<S> Default for EventRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
