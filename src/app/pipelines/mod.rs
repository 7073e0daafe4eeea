pub mod snapshot_pipeline;

pub use snapshot_pipeline::{DashboardReport, DashboardRequest, SnapshotPipeline};
