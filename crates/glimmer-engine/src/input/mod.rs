pub mod queue;
pub mod sample;
