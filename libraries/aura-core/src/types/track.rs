/// Track references
use std::fmt;
use std::sync::Arc;

/// Reference to a playable track
///
/// Either a remote/static URL that has to be fetched, or an in-memory file
/// the user picked locally. Immutable once created; the playlist owns them.
#[derive(Clone, PartialEq, Eq)]
pub enum TrackRef {
    /// Track addressed by URL (http(s), file:// or a plain local path)
    Url(String),

    /// In-memory encoded file supplied by the user
    File {
        /// Original file name, used as a decoder hint and for display
        name: String,
        /// Encoded bytes
        bytes: Arc<[u8]>,
    },
}

impl TrackRef {
    /// Create a URL track reference
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Create an in-memory file track reference
    pub fn file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Human-readable name (last path segment without query string)
    pub fn display_name(&self) -> String {
        match self {
            Self::Url(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                without_query
                    .rsplit(['/', '\\'])
                    .find(|segment| !segment.is_empty())
                    .unwrap_or(without_query)
                    .to_string()
            }
            Self::File { name, .. } => name.clone(),
        }
    }

    /// File extension hint for the decoder, lowercased
    pub fn extension_hint(&self) -> Option<String> {
        let name = self.display_name();
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

impl fmt::Debug for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::File { name, bytes } => f
                .debug_struct("File")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}
