//! Detection of structurally identical mesh buffers, so that copies of the same asset share one buffer.
pub mod deduplicator;
pub mod fingerprint;
