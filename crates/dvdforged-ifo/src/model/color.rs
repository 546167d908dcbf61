//! Shared, reference-counted subpicture color tables.
//!
//! Program chains hold a [`ColorId`] into a [`ColorArena`] rather than the
//! table itself, so several chains can share one instance and releasing a
//! chain never leaves another pointing at freed memory.

/// Marker for an unused color-table entry; distinct from every 24-bit color.
pub const COLOR_UNUSED: u32 = 0x0100_0000;

/// Sixteen-entry color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorInfo {
    pub colors: [u32; 16],
}

impl Default for ColorInfo {
    fn default() -> Self {
        Self {
            colors: [COLOR_UNUSED; 16],
        }
    }
}

impl ColorInfo {
    pub fn new(colors: [u32; 16]) -> Self {
        Self { colors }
    }

    /// Value as stored on disc: unused entries become zero.
    pub fn disc_value(&self, index: usize) -> u32 {
        match self.colors[index] {
            COLOR_UNUSED => 0,
            c => c & 0x00ff_ffff,
        }
    }
}

/// Handle to a table in a [`ColorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorId(usize);

#[derive(Debug)]
struct Slot {
    info: ColorInfo,
    refcount: u32,
}

/// Arena of color tables with explicit reference counts.
#[derive(Debug, Default)]
pub struct ColorArena {
    slots: Vec<Option<Slot>>,
}

impl ColorArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new table with one reference.
    pub fn insert(&mut self, info: ColorInfo) -> ColorId {
        let slot = Some(Slot { info, refcount: 1 });
        match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = slot;
                ColorId(free)
            }
            None => {
                self.slots.push(slot);
                ColorId(self.slots.len() - 1)
            }
        }
    }

    /// Add a reference; returns `false` if `id` was already freed.
    pub fn retain(&mut self, id: ColorId) -> bool {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(slot) => {
                slot.refcount += 1;
                true
            }
            None => false,
        }
    }

    /// Drop a reference, freeing the table at zero. Returns the remaining count.
    pub fn release(&mut self, id: ColorId) -> u32 {
        let Some(entry) = self.slots.get_mut(id.0) else {
            return 0;
        };
        let remaining = match entry.as_mut() {
            Some(slot) => {
                slot.refcount = slot.refcount.saturating_sub(1);
                slot.refcount
            }
            None => return 0,
        };
        if remaining == 0 {
            *entry = None;
        }
        remaining
    }

    pub fn get(&self, id: ColorId) -> Option<&ColorInfo> {
        self.slots.get(id.0)?.as_ref().map(|s| &s.info)
    }

    /// Current reference count; zero once freed.
    pub fn refcount(&self, id: ColorId) -> u32 {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map_or(0, |s| s.refcount)
    }

    /// Number of live tables.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
