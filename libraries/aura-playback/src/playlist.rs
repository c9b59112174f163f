//! Wrapping playlist with a one-shot uploaded-file override
//!
//! Structure:
//! ```text
//! Override (user upload, bypasses the list until cleared):
//!   - local-file.mp3
//! ─────────────────────────────
//! Tracks (static URLs, wraps around):
//!   - 01.mp3   <- current_index
//!   - 02.mp3
//! ```

use aura_core::TrackRef;

/// Ordered track list with a wrapping cursor
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    /// Tracks in play order
    tracks: Vec<TrackRef>,

    /// Current position (always < len when non-empty)
    current_index: usize,

    /// User-supplied file that bypasses the list
    override_file: Option<TrackRef>,
}

impl Playlist {
    /// Create a playlist positioned on the first track
    pub fn new(tracks: Vec<TrackRef>) -> Self {
        Self {
            tracks,
            current_index: 0,
            override_file: None,
        }
    }

    /// Create a playlist from URLs
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(urls.into_iter().map(TrackRef::url).collect())
    }

    /// Number of tracks (the override is not counted)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Current position
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&TrackRef> {
        self.tracks.get(index)
    }

    /// All tracks
    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    /// Track the transport should load: the override if set, else the
    /// current list entry
    pub fn current(&self) -> Option<&TrackRef> {
        self.override_file
            .as_ref()
            .or_else(|| self.tracks.get(self.current_index))
    }

    /// Move the cursor to `index`
    ///
    /// Returns `false` (cursor unchanged) if out of bounds.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    /// Advance the cursor, wrapping to the start
    ///
    /// Returns the new index, or `None` for an empty playlist.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.tracks.len();
        Some(self.current_index)
    }

    /// Move the cursor back, wrapping to the end
    ///
    /// Returns the new index, or `None` for an empty playlist.
    pub fn prev(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        self.current_index = (self.current_index + len - 1) % len;
        Some(self.current_index)
    }

    /// Install a user-supplied file that bypasses the list
    pub fn set_override(&mut self, track: TrackRef) {
        self.override_file = Some(track);
    }

    /// Remove the override
    pub fn clear_override(&mut self) -> Option<TrackRef> {
        self.override_file.take()
    }

    /// The current override, if any
    pub fn override_file(&self) -> Option<&TrackRef> {
        self.override_file.as_ref()
    }

    /// Append a track
    pub fn push(&mut self, track: TrackRef) {
        self.tracks.push(track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tracks() -> Playlist {
        Playlist::from_urls(["https://example.com/01.mp3", "https://example.com/02.mp3"])
    }

    #[test]
    fn next_wraps() {
        let mut playlist = two_tracks();
        assert_eq!(playlist.next(), Some(1));
        assert_eq!(playlist.next(), Some(0));
    }

    #[test]
    fn prev_wraps() {
        let mut playlist = two_tracks();
        assert_eq!(playlist.current_index(), 0);
        assert_eq!(playlist.prev(), Some(1));
        assert_eq!(playlist.prev(), Some(0));
    }

    #[test]
    fn empty_playlist_navigation() {
        let mut playlist = Playlist::default();
        assert_eq!(playlist.next(), None);
        assert_eq!(playlist.prev(), None);
        assert!(playlist.current().is_none());
    }

    #[test]
    fn set_current_bounds() {
        let mut playlist = two_tracks();
        assert!(playlist.set_current(1));
        assert!(!playlist.set_current(2));
        assert_eq!(playlist.current_index(), 1);
    }

    #[test]
    fn override_bypasses_list() {
        let mut playlist = two_tracks();
        playlist.set_override(TrackRef::file("mine.wav", vec![1, 2, 3]));
        assert_eq!(playlist.current().unwrap().display_name(), "mine.wav");

        // Navigation still moves the list cursor underneath
        assert_eq!(playlist.next(), Some(1));
        assert_eq!(playlist.current().unwrap().display_name(), "mine.wav");

        playlist.clear_override();
        assert_eq!(playlist.current().unwrap().display_name(), "02.mp3");
    }
}
