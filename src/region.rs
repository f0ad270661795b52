//! Priority region dispatcher.
//!
//! For input targets that don't fit in one subtree, such as a context menu layered over unrelated
//! trees. Regions are plain rectangles in window space with a handler and a priority; they know
//! nothing about elements.
//!
//! Nothing here decides whether regions or the element tree see an event first. Applications pick
//! an order and stick to it, typically regions first and the tree only if no region consumed it.

use crate::events::MouseEvent;
use crate::rect::Rect;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

/// Identifies a registered region.
///
/// Handles are never reused, so a handle stays valid (or stays stale) no matter what happens to
/// other regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionHandle(u64);

/// A region handler. Receives the dispatch context and the event; returns whether it consumed it.
pub struct RegionHandler<C>(Arc<Mutex<dyn FnMut(&mut C, &MouseEvent) -> bool + Send>>);

impl<C> Clone for RegionHandler<C> {
    fn clone(&self) -> Self {
        RegionHandler(Arc::clone(&self.0))
    }
}

impl<C> RegionHandler<C> {
    pub fn new<F: 'static + FnMut(&mut C, &MouseEvent) -> bool + Send>(handler: F) -> Self {
        RegionHandler(Arc::new(Mutex::new(handler)))
    }

    fn call(&self, cx: &mut C, event: &MouseEvent) -> bool {
        let mut handler = self.0.lock();
        (&mut *handler)(cx, event)
    }
}

impl<C> fmt::Debug for RegionHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RegionHandler")
    }
}

struct Region<C> {
    handle: RegionHandle,
    bounds: Rect,
    priority: i32,
    enabled: bool,
    tag: Option<u64>,
    handler: RegionHandler<C>,
}

/// Dispatches mouse events to the highest-priority enabled region under the cursor.
///
/// `C` is whatever the application wants handlers to see, e.g. an `ElementTree`.
pub struct RegionDispatcher<C> {
    /// Sorted by descending priority, then by registration order.
    regions: Vec<Region<C>>,
    next_handle: u64,
}

impl<C> Default for RegionDispatcher<C> {
    fn default() -> Self {
        RegionDispatcher {
            regions: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<C> fmt::Debug for RegionDispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let handles: Vec<_> = self.regions.iter().map(|region| region.handle).collect();
        f.debug_struct("RegionDispatcher")
            .field("regions", &handles)
            .finish()
    }
}

impl<C> RegionDispatcher<C> {
    pub fn new() -> RegionDispatcher<C> {
        RegionDispatcher::default()
    }

    /// Registers a region. Higher priorities are offered events first; equal priorities go in
    /// registration order.
    pub fn register_region(
        &mut self,
        bounds: Rect,
        handler: RegionHandler<C>,
        priority: i32,
    ) -> RegionHandle {
        self.register(bounds, handler, priority, None)
    }

    /// Registers a region with a tag, for removing groups of regions at once.
    pub fn register_region_with_tag(
        &mut self,
        bounds: Rect,
        handler: RegionHandler<C>,
        priority: i32,
        tag: u64,
    ) -> RegionHandle {
        self.register(bounds, handler, priority, Some(tag))
    }

    fn register(
        &mut self,
        bounds: Rect,
        handler: RegionHandler<C>,
        priority: i32,
        tag: Option<u64>,
    ) -> RegionHandle {
        let handle = RegionHandle(self.next_handle);
        self.next_handle += 1;
        self.regions.push(Region {
            handle,
            bounds,
            priority,
            enabled: true,
            tag,
            handler,
        });
        self.sort();
        debug!(?handle, priority, "registered region");
        handle
    }

    fn sort(&mut self) {
        self.regions
            .sort_by(|a, b| b.priority.cmp(&a.priority).then(a.handle.cmp(&b.handle)));
    }

    fn region_mut(&mut self, handle: RegionHandle) -> Option<&mut Region<C>> {
        self.regions.iter_mut().find(|region| region.handle == handle)
    }

    /// Offers an event to every enabled region containing it, in priority order, until one consumes
    /// it. Returns whether one did.
    pub fn dispatch_event(&self, cx: &mut C, event: &MouseEvent) -> bool {
        for region in &self.regions {
            if !region.enabled || !region.bounds.contains(event.location) {
                continue;
            }
            if region.handler.call(cx, event) {
                trace!(handle = ?region.handle, "region consumed event");
                return true;
            }
        }
        false
    }

    /// Moves or resizes a region. Returns false if the handle is stale.
    pub fn update_region_bounds(&mut self, handle: RegionHandle, bounds: Rect) -> bool {
        match self.region_mut(handle) {
            Some(region) => {
                region.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Returns false if the handle is stale.
    pub fn set_region_enabled(&mut self, handle: RegionHandle, enabled: bool) -> bool {
        match self.region_mut(handle) {
            Some(region) => {
                region.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Returns false if the handle is stale.
    pub fn set_region_priority(&mut self, handle: RegionHandle, priority: i32) -> bool {
        match self.region_mut(handle) {
            Some(region) => region.priority = priority,
            None => return false,
        }
        self.sort();
        true
    }

    /// Removes a region. Returns false if it was already gone.
    pub fn unregister_region(&mut self, handle: RegionHandle) -> bool {
        let count = self.regions.len();
        self.regions.retain(|region| region.handle != handle);
        let removed = self.regions.len() != count;
        if removed {
            debug!(?handle, "unregistered region");
        }
        removed
    }

    /// Removes all regions with the given tag. Returns how many there were.
    pub fn unregister_by_tag(&mut self, tag: u64) -> usize {
        let count = self.regions.len();
        self.regions.retain(|region| region.tag != Some(tag));
        let removed = count - self.regions.len();
        debug!(tag, removed, "unregistered regions by tag");
        removed
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_registered(&self, handle: RegionHandle) -> bool {
        self.regions.iter().any(|region| region.handle == handle)
    }

    pub fn region_bounds(&self, handle: RegionHandle) -> Option<Rect> {
        self.regions
            .iter()
            .find(|region| region.handle == handle)
            .map(|region| region.bounds)
    }

    pub fn is_region_enabled(&self, handle: RegionHandle) -> Option<bool> {
        self.regions
            .iter()
            .find(|region| region.handle == handle)
            .map(|region| region.enabled)
    }

    /// Removes every region. Existing handles become stale.
    pub fn clear(&mut self) {
        self.regions.clear();
    }
}
