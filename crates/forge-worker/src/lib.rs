pub mod batch_insert;
pub mod config;
pub mod delivery;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
