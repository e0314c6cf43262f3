//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use rf24_link::radio::prelude::*;
//! ```

use crate::types::{FifoState, RadioMode, StatusFlags};

use super::RadioConfig;

/// A trait to represent manipulation of [`StatusFlags`]
/// for an ESB capable transceiver.
pub trait EsbStatus {
    type StatusErrorType;

    /// Get the [`StatusFlags`] state that was clocked out during the latest SPI transaction.
    ///
    /// This snapshot is stale as soon as another transaction happens.
    fn get_status_flags(&self, flags: &mut StatusFlags);

    /// Clear the radio's status flags.
    ///
    /// Set any member of [`StatusFlags`] to `true` to clear the corresponding
    /// event (the chip's write-1-to-clear semantics). Members set to `false`
    /// are left untouched.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;

    /// Refresh the internal cache of status byte with a NOP transaction.
    ///
    /// Use [`EsbStatus::get_status_flags()`] to get the updated status flags.
    fn update(&mut self) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    ///
    /// This is called at the start of every attempt made by [`EsbRadio::send()`].
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;

    /// Has a payload been received (the STATUS register's RX_DR flag)?
    ///
    /// This is a cheap, side-effect free poll intended for tight loops.
    fn data_ready(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// This is similar to [`EsbFifo::data_ready()`] except the `pipe` parameter is given
    /// the pipe number that received the data.
    ///
    /// If there is no data ready, then `pipe` is set to [`None`].
    fn available_pipe(&mut self, pipe: &mut Option<u8>) -> Result<bool, Self::FifoErrorType>;

    /// Is the RX FIFO empty?
    ///
    /// This inspects the STATUS register's RX_P_NO field (bits 1 - 3), which the chip
    /// sets to `0b111` when there is nothing left to read.
    fn rx_fifo_empty(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// Is the RX FIFO full (the FIFO_STATUS register's RX_FULL flag)?
    fn rx_fifo_full(&mut self) -> Result<bool, Self::FifoErrorType>;
}

/// A trait to represent manipulation of the power state
/// for an ESB capable transceiver.
pub trait EsbPower {
    type PowerErrorType;

    /// Power down the radio.
    ///
    /// CE is deasserted first, so the radio stops listening.
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Power up the radio and wait for it to settle in standby mode.
    ///
    /// This does nothing if the radio is already powered up.
    fn power_up(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Is the radio powered up?
    fn is_powered(&self) -> bool;
}

pub trait EsbInit {
    type ConfigErrorType;

    /// Initialize the radio with the address to listen on and the static
    /// payload length, then enter RX mode.
    ///
    /// This is a shortcut for [`EsbInit::with_config()`]. The `packet_length`
    /// is clamped to the range [1, 32].
    fn init(&mut self, address: &[u8; 5], packet_length: u8)
        -> Result<(), Self::ConfigErrorType>;

    /// Reconfigure the radio using the given `config` object, then enter RX mode.
    ///
    /// Every register this driver relies on is re-written, so calling this
    /// twice with the same `config` leaves the radio in the same state as
    /// calling it once. Any transmission in progress is discarded.
    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;
}

/// A trait to represent manipulation of an ESB capable transceiver.
///
/// Although the name is rather generic, this trait describes the
/// behavior of a radio's rudimentary modes (RX and TX).
pub trait EsbRadio {
    type RadioErrorType;

    /// Put the radio into active RX mode.
    ///
    /// CONFIG is written as powered-up primary receiver, and CE is asserted
    /// after the mode-switch settle time.
    fn start_listening(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Stop listening by deasserting CE. CONFIG is left untouched.
    ///
    /// This is idempotent.
    fn stop_listening(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Is the radio in RX mode?
    fn is_rx(&self) -> bool;

    /// The mode the driver last put the radio in.
    fn mode(&self) -> RadioMode;

    /// The static payload length configured by [`EsbInit::init()`].
    fn payload_length(&self) -> u8;

    /// Blocking function to transmit a given payload to `address`, retrying
    /// until it is acknowledged.
    ///
    /// At most `max_attempts` attempts are made (values less than 1 are treated as 1).
    /// Each attempt fires the payload once and waits a fixed window for an ACK.
    ///
    /// Returns the 1-based number of the attempt that was acknowledged, or `0`
    /// if every attempt went unacknowledged.
    /// The radio is returned to RX mode either way. If the SPI bus or CE pin
    /// fails partway through, returning to RX mode is still attempted before
    /// the error is propagated.
    fn send(
        &mut self,
        buf: &[u8],
        address: &[u8; 5],
        max_attempts: u8,
    ) -> Result<u8, Self::RadioErrorType>;

    /// Transmit a given payload to `address` exactly once, without checking
    /// if it was acknowledged.
    ///
    /// This is [`EsbRadio::send()`] with `max_attempts` set to 1.
    fn transmit(&mut self, buf: &[u8], address: &[u8; 5]) -> Result<(), Self::RadioErrorType>;

    /// Read one payload from the radio's RX FIFO into the specified `buf`.
    ///
    /// The radio stops listening for the duration of the read. Any payload that
    /// arrives meanwhile is lost.
    /// The RX_DR flag is cleared only if the RX FIFO is empty afterward, so
    /// [`EsbFifo::data_ready()`] keeps reporting any payloads still queued.
    ///
    /// Returns the number of bytes stored to `buf`.
    fn read(&mut self, buf: &mut [u8]) -> Result<u8, Self::RadioErrorType>;

    /// Drain the RX FIFO, leaving only the latest payload in `buf`.
    ///
    /// Returns how many payloads were drained. Use [`EsbRadio::read()`] in a loop
    /// instead if every queued payload matters.
    fn receive(&mut self, buf: &mut [u8]) -> Result<u8, Self::RadioErrorType>;
}
