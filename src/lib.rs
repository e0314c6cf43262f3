//! A platform agnostic driver for the nRF24L01 2.4 GHz transceiver, built on the
//! [`embedded-hal`](https://docs.rs/embedded-hal) 1.0 traits.
//!
//! Each node listens on a single 5-byte address with a fixed payload length, and
//! transmissions are retried in software until the receiving node's automatic
//! acknowledgement arrives (or the caller's attempt budget runs out).
//!
//! ```ignore
//! use rf24_link::radio::{prelude::*, RF24};
//!
//! let mut radio = RF24::new(ce_pin, spi_device, delay);
//! radio.init(b"node1", 8)?;
//!
//! // returns the attempt that was acknowledged, or 0
//! let attempts = radio.send(b"hi there", b"node2", 5)?;
//!
//! let mut buf = [0u8; 8];
//! if radio.data_ready()? {
//!     radio.receive(&mut buf)?;
//! }
//! ```
//!
//! ## Basic API
//!
//! - [`RF24::new()`](fn@crate::radio::RF24::new)
//! - [`RF24::init()`](radio/struct.RF24.html#method.init)
//! - [`RF24::data_ready()`](radio/struct.RF24.html#method.data_ready)
//! - [`RF24::receive()`](radio/struct.RF24.html#method.receive)
//! - [`RF24::transmit()`](radio/struct.RF24.html#method.transmit)
//! - [`RF24::send()`](radio/struct.RF24.html#method.send)
//!
//! ## Advanced API
//!
//! - [`RF24::read()`](radio/struct.RF24.html#method.read)
//! - [`RF24::start_listening()`](radio/struct.RF24.html#method.start_listening)
//! - [`RF24::stop_listening()`](radio/struct.RF24.html#method.stop_listening)
//! - [`RF24::rx_fifo_empty()`](radio/struct.RF24.html#method.rx_fifo_empty)
//! - [`RF24::rx_fifo_full()`](radio/struct.RF24.html#method.rx_fifo_full)
//! - [`RF24::available_pipe()`](radio/struct.RF24.html#method.available_pipe)
//! - [`RF24::get_fifo_state()`](radio/struct.RF24.html#method.get_fifo_state)
//! - [`RF24::flush_rx()`](radio/struct.RF24.html#method.flush_rx)
//! - [`RF24::flush_tx()`](radio/struct.RF24.html#method.flush_tx)
//! - [`RF24::clear_status_flags()`](radio/struct.RF24.html#method.clear_status_flags)
//! - [`RF24::update()`](radio/struct.RF24.html#method.update)
//! - [`RF24::get_status_flags()`](radio/struct.RF24.html#method.get_status_flags)
//! - [`RF24::power_up()`](radio/struct.RF24.html#method.power_up)
//! - [`RF24::power_down()`](radio/struct.RF24.html#method.power_down)
//!
//! ## Feature-flags
//!
//! - **defmt:** implements `defmt::Format` for public types and logs transmission
//!   outcomes with `defmt`.
#![no_std]

use embedded_hal::spi;

mod types;
pub use types::{FifoState, RadioMode, StatusFlags};
pub mod radio;

/// SPI mode. Use this when initializing the SPI instance.
pub const SPI_MODE: spi::Mode = spi::MODE_0;
/// The fastest SPI clock (in Hz) the radio supports.
pub const SPI_MAX_FREQUENCY_HZ: u32 = 10_000_000;
