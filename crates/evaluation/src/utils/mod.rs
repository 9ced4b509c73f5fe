pub mod frame_processing;
pub mod report;
