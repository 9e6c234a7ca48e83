pub mod conversion;
pub mod instancing;
pub mod pipeline;
pub mod report;
pub mod settings;
