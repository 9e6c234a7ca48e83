//! The JSON scene document. Meshes live in a table and nodes refer to them by index, which is how
//! instancing survives a round trip: two nodes with the same index share one [`crate::mesh::SharedMesh`].
pub mod reader;
pub mod types;
pub mod writer;
