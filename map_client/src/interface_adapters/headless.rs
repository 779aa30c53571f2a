// Headless map surface: keeps markers in memory and reports a fixed viewport.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{MarkerHandle, MarkerSpec, ViewportBounds};
use crate::domain::ports::MapSurface;

#[derive(Default)]
pub struct HeadlessMap {
    viewport: Mutex<Option<ViewportBounds>>,
    markers: Mutex<BTreeMap<MarkerHandle, MarkerSpec>>,
    next_handle: AtomicU64,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(bounds: ViewportBounds) -> Self {
        let map = Self::default();
        map.set_viewport(bounds);
        map
    }

    // Equivalent of the user panning or zooming; the caller raises the event.
    pub fn set_viewport(&self, bounds: ViewportBounds) {
        *self
            .viewport
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(bounds);
    }

    // Markers in the order they were added.
    pub fn markers(&self) -> Vec<MarkerSpec> {
        self.lock_markers().values().cloned().collect()
    }

    pub fn marker_count(&self) -> usize {
        self.lock_markers().len()
    }

    // Fires the click handler of the `index`-th marker.
    pub fn click(&self, index: usize) -> bool {
        let click = self
            .lock_markers()
            .values()
            .nth(index)
            .map(|spec| spec.on_click.clone());
        click.is_some_and(|click| click.fire())
    }

    fn lock_markers(&self) -> MutexGuard<'_, BTreeMap<MarkerHandle, MarkerSpec>> {
        self.markers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapSurface for HeadlessMap {
    fn bounds(&self) -> Option<ViewportBounds> {
        *self.viewport.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add_marker(&self, spec: MarkerSpec) -> Result<MarkerHandle, String> {
        let handle = MarkerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.lock_markers().insert(handle, spec);
        Ok(handle)
    }

    fn remove_markers(&self, handles: &[MarkerHandle]) {
        let mut markers = self.lock_markers();
        for handle in handles {
            markers.remove(handle);
        }
    }
}
