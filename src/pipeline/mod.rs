pub mod batch;
pub mod item_processor;
pub mod job_runner;
pub mod orchestrator;
