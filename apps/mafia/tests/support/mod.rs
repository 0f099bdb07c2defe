pub mod harness;
pub mod logging;

pub use harness::Harness;
