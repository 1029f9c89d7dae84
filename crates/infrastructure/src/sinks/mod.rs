//! Result sinks - Implementations of ResultSinkPort

mod json_lines_sink;
mod snapshot_file_sink;

pub use json_lines_sink::JsonLinesSink;
pub use snapshot_file_sink::SnapshotFileSink;
