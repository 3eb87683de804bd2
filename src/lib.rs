pub mod bootstrap;
pub mod cache;
pub mod coingecko;
pub mod config;
pub mod errors;
pub mod logger;
pub mod resample;
pub mod scheduler;
pub mod webserver;

#[cfg(test)]
pub(crate) mod testutil;
