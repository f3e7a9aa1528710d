//! Bounded widget registry.
//!
//! Widgets are created lazily the first time the application asks for them
//! and live as long as the engine. Entries are stored in an arena; a
//! per-family [`FxHashMap`] indexes them by id.
//!
//! Each family holds at most `capacity` widgets. Asking for a new id in a
//! full family fails with [`Error::RegistryFull`]; ids already registered stay
//! reachable.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::WidgetKind;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default per-family widget capacity.
pub const MAX_WIDGETS: usize = 16;

/// Widget ids longer than this are truncated on registration.
pub const MAX_WIDGET_ID_LENGTH: usize = 31;

// ============================================================================
// WidgetEntry
// ============================================================================

/// Per-widget state kept by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEntry {
    id: String,
    kind: WidgetKind,
    /// Next auto-increment x for charts.
    next_point: i32,
}

impl WidgetEntry {
    /// Creates an entry, truncating the id to [`MAX_WIDGET_ID_LENGTH`] bytes.
    #[must_use]
    pub fn new(id: &str, kind: WidgetKind) -> Self {
        Self {
            id: truncate_id(id).to_string(),
            kind,
            next_point: 0,
        }
    }

    /// Returns the widget id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the widget family.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Returns the next auto-increment x.
    #[inline]
    #[must_use]
    pub const fn next_point(&self) -> i32 {
        self.next_point
    }

    /// Returns the current auto-increment x and advances it.
    pub(crate) fn take_point(&mut self) -> i32 {
        let x = self.next_point;
        self.next_point = self.next_point.wrapping_add(1);
        x
    }

    /// Restarts the auto-increment x at zero.
    pub(crate) fn reset_points(&mut self) {
        self.next_point = 0;
    }
}

/// Cuts `id` to at most [`MAX_WIDGET_ID_LENGTH`] bytes on a char boundary.
pub(crate) fn truncate_id(id: &str) -> &str {
    if id.len() <= MAX_WIDGET_ID_LENGTH {
        return id;
    }
    let mut end = MAX_WIDGET_ID_LENGTH;
    while !id.is_char_boundary(end) {
        end -= 1;
    }
    &id[..end]
}

// ============================================================================
// WidgetRegistry
// ============================================================================

/// Arena of display widgets indexed by family and id.
#[derive(Debug)]
pub struct WidgetRegistry {
    entries: Vec<WidgetEntry>,
    index: FxHashMap<WidgetKind, FxHashMap<String, usize>>,
    capacity: usize,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetRegistry {
    /// Creates a registry with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_WIDGETS)
    }

    /// Creates a registry holding up to `capacity` widgets per family.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
            capacity,
        }
    }

    /// Returns the per-family capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the total number of widgets.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no widget is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of widgets in one family.
    #[must_use]
    pub fn count(&self, kind: WidgetKind) -> usize {
        self.index.get(&kind).map_or(0, FxHashMap::len)
    }

    /// Looks up a widget without registering it.
    #[must_use]
    pub fn get(&self, kind: WidgetKind, id: &str) -> Option<&WidgetEntry> {
        let slot = *self.index.get(&kind)?.get(truncate_id(id))?;
        self.entries.get(slot)
    }

    /// Returns the widget with `id`, registering it if new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryFull`] if `id` is new and the family is at
    /// capacity.
    pub fn acquire(&mut self, kind: WidgetKind, id: &str) -> Result<&mut WidgetEntry> {
        let id = truncate_id(id);
        let family = self.index.entry(kind).or_default();

        let slot = match family.get(id) {
            Some(&slot) => slot,
            None => {
                if family.len() >= self.capacity {
                    warn!(%kind, id, capacity = self.capacity, "Widget registry full");
                    return Err(Error::registry_full(kind, self.capacity));
                }
                let slot = self.entries.len();
                self.entries.push(WidgetEntry::new(id, kind));
                family.insert(id.to_string(), slot);
                debug!(%kind, id, slot, "Widget registered");
                slot
            }
        };

        // Slots come from the arena length and entries are never removed.
        self.entries
            .get_mut(slot)
            .ok_or_else(|| Error::registry_full(kind, self.capacity))
    }

    /// Iterates every registered widget in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetEntry> {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
