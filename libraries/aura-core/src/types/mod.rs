//! Domain types shared across the workspace

mod audio;
mod ids;
mod track;

pub use audio::{DecodedAudio, SampleRate};
pub use ids::SourceId;
pub use track::TrackRef;
