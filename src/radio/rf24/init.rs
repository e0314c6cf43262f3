use super::{bit_fields::Config, mnemonics, timing, Nrf24Error, Register, RF24};
use crate::radio::{
    prelude::{EsbInit, EsbRadio},
    RadioConfig,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> EsbInit for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn init(&mut self, address: &[u8; 5], packet_length: u8) -> Result<(), Self::ConfigErrorType> {
        let config = RadioConfig::default()
            .with_rx_address(address)
            .with_payload_length(packet_length);
        self.with_config(&config)
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        self._payload_length = config.payload_length();

        // configuration bits will not stick until the radio settles after power on
        self._delay_impl.delay_ms(timing::POWER_ON_SETTLE_MS);
        self.stop_listening()?;

        self._config_reg = Config::new();
        self.spi_write_byte(Register::CONFIG, self._config_reg.into_bits())?;
        self.spi_write_byte(Register::RX_PW_P1, self._payload_length)?;
        self.spi_write_byte(Register::EN_AA, mnemonics::ENAA_P0 | mnemonics::ENAA_P1)?;
        // retransmission is handled in software by `send()`
        self.spi_write_byte(Register::SETUP_RETR, 0)?;
        self.spi_write_buf(Register::RX_ADDR_P1, &config.rx_address())?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "radio configured: rx address {:X}, payload length {}",
            config.rx_address(),
            self._payload_length
        );

        self.start_listening()
    }
}
