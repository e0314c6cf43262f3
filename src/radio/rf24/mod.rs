use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
pub(crate) mod bit_fields;
use bit_fields::Config;
mod constants;
mod fifo;
mod init;
mod power;
mod radio;
mod status;
pub use constants::{commands, mnemonics, timing, Register};

use crate::types::{RadioMode, StatusFlags};

/// The largest payload (in bytes) the radio can send or receive.
pub const MAX_PAYLOAD_LENGTH: u8 = 32;

/// An collection of error types to describe hardware malfunctions.
///
/// The radio itself reports no errors over SPI; these only wrap what the
/// HAL implementations report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
}

#[cfg(feature = "defmt")]
impl<SPI, DO> defmt::Format for Nrf24Error<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Nrf24Error::Spi(_) => defmt::write!(fmt, "SPI error"),
            Nrf24Error::Gpo(_) => defmt::write!(fmt, "GPO error"),
        }
    }
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// The driver assumes it exclusively owns the SPI bus and the CE pin.
/// Every operation blocks until its SPI transactions and settle delays finish.
pub struct RF24<SPI, DO, DELAY> {
    _spi: SPI,
    _ce_pin: DO,
    _delay_impl: DELAY,
    _buf: [u8; MAX_PAYLOAD_LENGTH as usize + 1],
    _status: StatusFlags,
    _config_reg: Config,
    _mode: RadioMode,
    _payload_length: u8,
}

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`RF24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter). Use [`SPI_MODE`](crate::SPI_MODE)
    /// when configuring the bus.
    ///
    /// Nothing is sent to the radio until
    /// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init) is called.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> RF24<SPI, DO, DELAY> {
        RF24 {
            _spi: spi,
            _ce_pin: ce_pin,
            _delay_impl: delay_impl,
            _buf: [0u8; MAX_PAYLOAD_LENGTH as usize + 1],
            _status: StatusFlags::from_bits(0),
            _config_reg: Config::new(),
            _mode: RadioMode::Tx,
            _payload_length: 8,
        }
    }

    /// Run one CSN-framed transaction over the first `len` bytes of the internal buffer.
    ///
    /// The radio always clocks out its STATUS byte first.
    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    /// Send `command` followed by `len` dummy bytes (`0xFF`).
    ///
    /// The bytes clocked back are left in `self._buf[1..=len]`.
    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::FLUSH_TX)?;
    /// ```
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..=len as usize].fill(commands::NOP);
        self.spi_transfer(len + 1)
    }

    fn read_register(
        &mut self,
        register: Register,
    ) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, commands::R_REGISTER | register.addr())?;
        Ok(self._buf[1])
    }

    fn spi_write_byte(
        &mut self,
        register: Register,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = commands::W_REGISTER | register.addr();
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    fn spi_write_buf(
        &mut self,
        register: Register,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = commands::W_REGISTER | register.addr();
        let buf_len = buf.len().min(MAX_PAYLOAD_LENGTH as usize);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    /// Load exactly one payload of the configured length into the TX FIFO.
    ///
    /// A short `buf` is padded with zeros; excess bytes are ignored.
    fn write_payload(&mut self, buf: &[u8]) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let len = self._payload_length as usize;
        let copied = buf.len().min(len);
        self._buf[0] = commands::W_TX_PAYLOAD;
        self._buf[1..(copied + 1)].copy_from_slice(&buf[..copied]);
        self._buf[(copied + 1)..(len + 1)].fill(0);
        self.spi_transfer(self._payload_length + 1)
    }

    /// Fetch exactly one payload of the configured length from the RX FIFO.
    ///
    /// Returns how many bytes fit into `buf`.
    fn read_payload(&mut self, buf: &mut [u8]) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(self._payload_length, commands::R_RX_PAYLOAD)?;
        let copied = buf.len().min(self._payload_length as usize);
        buf[..copied].copy_from_slice(&self._buf[1..(copied + 1)]);
        Ok(copied as u8)
    }
}
