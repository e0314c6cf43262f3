use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbFifo, Nrf24Error, RF24};
use crate::{FifoState, StatusFlags};

use super::{commands, mnemonics, Register};

impl<SPI, DO, DELAY> EsbFifo for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Use this to discard all 3 layers in the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        let fifo_status = self.read_register(Register::FIFO_STATUS)?;
        let offset = about_tx as u8 * 4;
        let status = (fifo_status & (3 << offset)) >> offset;
        match status {
            1 => Ok(FifoState::Empty),
            2 => Ok(FifoState::Full),
            _ => Ok(FifoState::Occupied),
        }
    }

    fn data_ready(&mut self) -> Result<bool, Self::FifoErrorType> {
        let status = StatusFlags::from_bits(self.read_register(Register::STATUS)?);
        Ok(status.rx_dr())
    }

    fn available_pipe(&mut self, pipe: &mut Option<u8>) -> Result<bool, Self::FifoErrorType> {
        let status = StatusFlags::from_bits(self.read_register(Register::STATUS)?);
        if status.rx_dr() && !status.rx_fifo_empty() {
            *pipe = Some(status.rx_pipe());
            return Ok(true);
        }
        *pipe = None;
        Ok(false)
    }

    fn rx_fifo_empty(&mut self) -> Result<bool, Self::FifoErrorType> {
        let status = StatusFlags::from_bits(self.read_register(Register::STATUS)?);
        Ok(status.rx_fifo_empty())
    }

    fn rx_fifo_full(&mut self) -> Result<bool, Self::FifoErrorType> {
        Ok(self.read_register(Register::FIFO_STATUS)? & mnemonics::RX_FULL != 0)
    }
}
