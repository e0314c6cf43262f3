use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{prelude::EsbPower, Nrf24Error, RF24},
    types::RadioMode,
};

use super::{timing, Register};

impl<SPI, DO, DELAY> EsbPower for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA).
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType> {
        self._ce_pin.set_low().map_err(Nrf24Error::Gpo)?; // Guarantee CE is low on powerDown
        self._mode = RadioMode::Tx;
        self._config_reg = self._config_reg.with_power(false);
        self.spi_write_byte(Register::CONFIG, self._config_reg.into_bits())
    }

    fn power_up(&mut self) -> Result<(), Self::PowerErrorType> {
        if self._config_reg.power() {
            return Ok(());
        }
        self._config_reg = self._config_reg.with_power(true);
        self.spi_write_byte(Register::CONFIG, self._config_reg.into_bits())?;
        // the radio passes through standby before CE may be asserted
        self._delay_impl.delay_ms(timing::MODE_SETTLE_MS);
        Ok(())
    }

    fn is_powered(&self) -> bool {
        self._config_reg.power()
    }
}
