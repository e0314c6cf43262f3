//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod rf24;
pub use rf24::{commands, mnemonics, timing, Nrf24Error, Register, MAX_PAYLOAD_LENGTH, RF24};

mod config;
pub use config::RadioConfig;
