// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The application layer talks to discovery through this trait
// so it never needs to know how a dataset is laid out on disk.
//
// Implementations:
//   - DatasetDiscovery -> walks one dataset root with walkdir
//   - a Vec of entries  -> handy in tests

use crate::domain::entry::RawFileEntry;
use crate::domain::error::PrepError;

pub type EntryIter<'a> = Box<dyn Iterator<Item = Result<RawFileEntry, PrepError>> + 'a>;

// ─── EntrySource ──────────────────────────────────────────────────────────────
/// Anything that can enumerate raw dataset files.
///
/// The returned iterator is lazy and finite. Calling discover()
/// again starts a fresh pass over the same files.
pub trait EntrySource {
    fn discover(&self) -> EntryIter<'_>;
}

impl EntrySource for Vec<RawFileEntry> {
    fn discover(&self) -> EntryIter<'_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}
