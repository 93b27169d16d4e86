//! Frame sinks: where rendered frames go.
//!
//! Sinks consume frames in timeline order. [`sink_for_path`] picks one from an output extension.

/// `ffmpeg`-based video sink (system binary).
pub mod ffmpeg;
/// GIF and PNG-sequence sinks built on the `image` crate.
pub mod image_seq;
/// Generic frame sink trait, the in-memory sink, and extension dispatch.
pub mod sink;

pub use sink::sink_for_path;
