pub mod board;
pub mod time;
pub mod timer;
