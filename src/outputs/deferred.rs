use std::sync::{Arc, RwLock};

use crate::kernel::telemetry::{Metadata, Sink, SinkError};

/// A backend that loads after first paint, like a tag-manager script.
///
/// Reports unavailable until [`DeferredSink::install`] provides the real
/// backend. Events emitted before that are dropped, not queued.
pub struct DeferredSink {
    name: String,
    inner: RwLock<Option<Arc<dyn Sink>>>,
}

impl DeferredSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: RwLock::new(None),
        }
    }

    pub fn install(&self, sink: Arc<dyn Sink>) {
        let mut slot = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *slot = Some(sink);
    }

    pub fn uninstall(&self) {
        let mut slot = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *slot = None;
    }

    fn current(&self) -> Option<Arc<dyn Sink>> {
        self.inner.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl std::fmt::Debug for DeferredSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredSink")
            .field("name", &self.name)
            .field("loaded", &self.current().is_some())
            .finish()
    }
}

impl Sink for DeferredSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.current().map_or(false, |sink| sink.is_available())
    }

    fn send(&self, action: &str, metadata: Metadata) -> Result<(), SinkError> {
        match self.current() {
            Some(sink) => sink.send(action, metadata),
            None => Err(SinkError::Unavailable),
        }
    }
}
