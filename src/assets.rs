//! Icon manifest and image load tracking
//!
//! Bitmaps load asynchronously and in any order. Each load either succeeds
//! or fails, and both outcomes count toward a [`LoadBarrier`] that releases
//! exactly once, when every requested image has settled.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::sim::IconId;

/// Directory icons are fetched from, relative to the page
pub const IMAGE_DIR: &str = "images";

/// Placeholder file name shipped in the template manifest
pub const PLACEHOLDER_FILE: &str = "example.png";

/// One launchable icon: display name and bitmap file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
    pub name: String,
    pub file: String,
}

impl IconEntry {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Relative URL the bitmap is fetched from
    pub fn path(&self) -> String {
        format!("{}/{}", IMAGE_DIR, self.file)
    }
}

/// Largest manifest an [`IconId`] can address
pub const MAX_ICONS: usize = u16::MAX as usize + 1;

/// Ordered list of icons. An icon's index is its [`IconId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconManifest {
    entries: Vec<IconEntry>,
}

impl Default for IconManifest {
    fn default() -> Self {
        Self::new(vec![
            IconEntry::new("No AI", "no-ai-100.png"),
            IconEntry::new("Adam Neely", "adam-100.png"),
            IconEntry::new("Rick Beato", "rick-100.png"),
            IconEntry::new("Dude", "dude-100.png"),
            IconEntry::new("Billie", "billie-100.png"),
            IconEntry::new("Nicki", "nicki-100.png"),
            IconEntry::new("Pete", "pete-100.png"),
        ])
    }
}

impl IconManifest {
    pub fn new(entries: Vec<IconEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: IconId) -> Option<&IconEntry> {
        self.entries.get(id.index())
    }

    /// Iterate entries with their ids. Entries past [`MAX_ICONS`] have no id and are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (IconId, &IconEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map_while(|(i, entry)| u16::try_from(i).ok().map(|i| (IconId(i), entry)))
    }

    /// True when nothing real has been configured yet (show a hint instead of buttons)
    pub fn is_placeholder(&self) -> bool {
        match self.entries.as_slice() {
            [] => true,
            [only] => only.file == PLACEHOLDER_FILE,
            _ => false,
        }
    }
}

/// Asset errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The image has not finished loading yet
    NotLoaded(String),
    /// The image failed to load and can never be used
    LoadFailed(String),
    /// No manifest entry with this id
    UnknownIcon(IconId),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotLoaded(file) => write!(f, "Image not loaded: {}", file),
            AssetError::LoadFailed(file) => write!(f, "Image failed to load: {}", file),
            AssetError::UnknownIcon(id) => write!(f, "Unknown icon id: {}", id.0),
        }
    }
}

impl std::error::Error for AssetError {}

/// Join counter over N independent loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBarrier {
    total: usize,
    settled: usize,
    released: bool,
}

impl LoadBarrier {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            settled: 0,
            released: false,
        }
    }

    /// Record one settled load (success or failure).
    /// Returns true on the call that completes the barrier, and only then.
    pub fn settle(&mut self) -> bool {
        if self.settled < self.total {
            self.settled += 1;
        }
        self.poll_release()
    }

    /// Returns true exactly once, as soon as every load has settled.
    /// A barrier over zero loads releases on the first poll.
    pub fn poll_release(&mut self) -> bool {
        if self.is_complete() && !self.released {
            self.released = true;
            return true;
        }
        false
    }

    pub fn is_complete(&self) -> bool {
        self.settled == self.total
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.settled, self.total)
    }
}

/// Load state of a single icon bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Tracks which icons are spawnable
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    files: Vec<String>,
    states: Vec<LoadState>,
    barrier: LoadBarrier,
}

impl AssetRegistry {
    pub fn new(manifest: &IconManifest) -> Self {
        let files: Vec<String> = manifest.iter().map(|(_, e)| e.file.clone()).collect();
        let count = files.len();
        Self {
            files,
            states: vec![LoadState::Pending; count],
            barrier: LoadBarrier::new(count),
        }
    }

    /// Mark an icon's bitmap loaded. Returns true if this completed the barrier.
    pub fn mark_loaded(&mut self, id: IconId) -> bool {
        self.settle(id, LoadState::Ready)
    }

    /// Mark an icon's bitmap failed. Returns true if this completed the barrier.
    pub fn mark_failed(&mut self, id: IconId) -> bool {
        if let Some(file) = self.files.get(id.index()) {
            log::warn!("Failed to load: {}/{}", IMAGE_DIR, file);
        }
        self.settle(id, LoadState::Failed)
    }

    fn settle(&mut self, id: IconId, new_state: LoadState) -> bool {
        let Some(state) = self.states.get_mut(id.index()) else {
            log::warn!("Load result for unknown icon id {}", id.0);
            return false;
        };
        if *state != LoadState::Pending {
            log::debug!("Ignoring repeated load result for icon {}", id.0);
            return false;
        }
        *state = new_state;
        let released = self.barrier.settle();
        if released {
            let (settled, total) = self.barrier.progress();
            log::info!(
                "Images settled: {}/{} ({} ready)",
                settled,
                total,
                self.ready_count()
            );
        }
        released
    }

    /// Release the barrier when there was nothing to load
    pub fn poll_release(&mut self) -> bool {
        self.barrier.poll_release()
    }

    pub fn state(&self, id: IconId) -> Option<LoadState> {
        self.states.get(id.index()).copied()
    }

    pub fn ready_count(&self) -> usize {
        self.states.iter().filter(|s| **s == LoadState::Ready).count()
    }

    pub fn all_settled(&self) -> bool {
        self.barrier.is_complete()
    }

    /// Check an icon can be spawned
    pub fn ensure_available(&self, id: IconId) -> Result<(), AssetError> {
        let (Some(state), Some(file)) = (self.states.get(id.index()), self.files.get(id.index()))
        else {
            return Err(AssetError::UnknownIcon(id));
        };
        match state {
            LoadState::Ready => Ok(()),
            LoadState::Pending => Err(AssetError::NotLoaded(file.clone())),
            LoadState::Failed => Err(AssetError::LoadFailed(file.clone())),
        }
    }
}
