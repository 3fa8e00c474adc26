pub mod orchestrator;
pub mod probe;
pub mod probes;
pub mod report;
pub mod snapshot;
