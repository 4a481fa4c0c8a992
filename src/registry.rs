use std::fmt;

/// Opaque handle the presentation layer keys its widgets on. Never reused
/// within one registry.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClockId(u64);

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock-{}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClockEntry {
    pub id: ClockId,
    pub timezone_id: String,
    pub label: String,
}

impl ClockEntry {
    /// Label shown to the user; a cleared label falls back to the timezone.
    pub fn display_label(&self) -> &str {
        let trimmed = self.label.trim();
        if trimmed.is_empty() {
            &self.timezone_id
        } else {
            trimmed
        }
    }
}

/// Ordered clock entries. Identifiers are not validated here; an unknown
/// timezone only fails when its entry is rendered.
#[derive(Debug, Default)]
pub struct ClockRegistry {
    entries: Vec<ClockEntry>,
    next_id: u64,
}

impl ClockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, timezone_id: impl Into<String>) -> ClockEntry {
        let timezone_id = timezone_id.into();
        let label = timezone_id.clone();
        self.add_labeled(timezone_id, label)
    }

    pub fn add_labeled(
        &mut self,
        timezone_id: impl Into<String>,
        label: impl Into<String>,
    ) -> ClockEntry {
        let id = ClockId(self.next_id);
        self.next_id += 1;
        let entry = ClockEntry {
            id,
            timezone_id: timezone_id.into(),
            label: label.into(),
        };
        tracing::debug!(%id, timezone = %entry.timezone_id, "clock added");
        self.entries.push(entry.clone());
        entry
    }

    /// Idempotent; returns the removed entry when it was still present.
    pub fn remove(&mut self, id: ClockId) -> Option<ClockEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let removed = self.entries.remove(index);
        tracing::debug!(%id, timezone = %removed.timezone_id, "clock removed");
        Some(removed)
    }

    pub fn all(&self) -> &[ClockEntry] {
        &self.entries
    }

    pub fn get(&self, id: ClockId) -> Option<&ClockEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Switches the zone. A label that still mirrored the old zone follows
    /// the new one.
    pub fn set_timezone(&mut self, id: ClockId, timezone_id: impl Into<String>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        let timezone_id = timezone_id.into();
        if entry.label == entry.timezone_id {
            entry.label = timezone_id.clone();
        }
        entry.timezone_id = timezone_id;
        true
    }

    pub fn set_label(&mut self, id: ClockId, label: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.label = label.into();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
