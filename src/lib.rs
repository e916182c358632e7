pub mod artifacts;
pub mod config;
pub mod deploy;
pub mod eth_client;
pub mod logging;
pub mod stopper;
pub mod test_utils;
pub mod wallet;
