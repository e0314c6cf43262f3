use super::{bit_fields::Config, timing, Nrf24Error, Register, RF24};
use crate::{
    radio::prelude::{EsbFifo, EsbRadio, EsbStatus},
    types::RadioMode,
    StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Make one attempt at delivering `buf` to `address`.
    ///
    /// Returns `true` if the receiving radio acknowledged the payload.
    /// The radio is left idle (CE low) in TX mode.
    fn attempt_delivery(
        &mut self,
        buf: &[u8],
        address: &[u8; 5],
    ) -> Result<bool, Nrf24Error<SPI::Error, DO::Error>> {
        self.stop_listening()?;
        // discard whatever a previous failed attempt left behind
        self.flush_tx()?;
        self.clear_status_flags(StatusFlags::default().with_tx_ds(true))?;

        // pipe 0 receives the ACK, so it must match the destination
        self.spi_write_buf(Register::TX_ADDR, address)?;
        self.spi_write_buf(Register::RX_ADDR_P0, address)?;

        self._config_reg = Config::new().as_tx();
        self.spi_write_byte(Register::CONFIG, self._config_reg.into_bits())?;
        self.write_payload(buf)?;

        self._ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_ms(timing::TX_PULSE_MS);
        self._ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_ms(timing::ACK_WINDOW_MS);

        let status = StatusFlags::from_bits(self.read_register(Register::STATUS)?);
        // a set MAX_RT flag would block the next transmission
        self.clear_status_flags(StatusFlags::default().with_tx_df(true))?;
        Ok(status.tx_ds())
    }

    /// Attempt delivery up to `max_attempts` times.
    ///
    /// Returns the acknowledged attempt, or 0. TX_DS is cleared on success.
    fn deliver_within(
        &mut self,
        buf: &[u8],
        address: &[u8; 5],
        max_attempts: u8,
    ) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        for attempt in 1..=max_attempts {
            if self.attempt_delivery(buf, address)? {
                self.clear_status_flags(StatusFlags::default().with_tx_ds(true))?;
                return Ok(attempt);
            }
            #[cfg(feature = "defmt")]
            defmt::trace!("attempt {}/{} was not acknowledged", attempt, max_attempts);
        }
        Ok(0)
    }
}

impl<SPI, DO, DELAY> EsbRadio for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RadioErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn start_listening(&mut self) -> Result<(), Self::RadioErrorType> {
        self._config_reg = Config::new().as_rx();
        self.spi_write_byte(Register::CONFIG, self._config_reg.into_bits())?;
        self._delay_impl.delay_ms(timing::MODE_SETTLE_MS);
        self._ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._mode = RadioMode::Rx;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), Self::RadioErrorType> {
        self._ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self._mode = RadioMode::Tx;
        Ok(())
    }

    fn is_rx(&self) -> bool {
        self._mode == RadioMode::Rx
    }

    fn mode(&self) -> RadioMode {
        self._mode
    }

    fn payload_length(&self) -> u8 {
        self._payload_length
    }

    /// See [`EsbRadio::send()`] for implementation-agnostic detail.
    ///
    /// The chip's own auto-retransmit feature is disabled by
    /// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init),
    /// so every attempt is paced by the fixed [`timing::TX_PULSE_MS`] and
    /// [`timing::ACK_WINDOW_MS`] windows.
    fn send(
        &mut self,
        buf: &[u8],
        address: &[u8; 5],
        max_attempts: u8,
    ) -> Result<u8, Self::RadioErrorType> {
        let max_attempts = max_attempts.max(1);
        let attempt = match self.deliver_within(buf, address, max_attempts) {
            Ok(attempt) => attempt,
            Err(e) => {
                // the first error is the one reported
                let _ = self.start_listening();
                return Err(e);
            }
        };
        self.start_listening()?;

        #[cfg(feature = "defmt")]
        if attempt > 0 {
            defmt::debug!("payload delivered on attempt {}", attempt);
        } else {
            defmt::warn!("payload undelivered after {} attempts", max_attempts);
        }
        Ok(attempt)
    }

    fn transmit(&mut self, buf: &[u8], address: &[u8; 5]) -> Result<(), Self::RadioErrorType> {
        self.send(buf, address, 1)?;
        Ok(())
    }

    /// See [`EsbRadio::read()`] for implementation-agnostic detail.
    ///
    /// This blocks for at least [`timing::READ_SETTLE_MS`] plus
    /// [`timing::MODE_SETTLE_MS`].
    fn read(&mut self, buf: &mut [u8]) -> Result<u8, Self::RadioErrorType> {
        self.stop_listening()?;
        let len = self.read_payload(buf)?;
        self._delay_impl.delay_ms(timing::READ_SETTLE_MS);
        if self.rx_fifo_empty()? {
            self.clear_status_flags(StatusFlags::default().with_rx_dr(true))?;
        }
        self.start_listening()?;
        Ok(len)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<u8, Self::RadioErrorType> {
        let mut count = 0u8;
        while self.data_ready()? {
            self.read(buf)?;
            count = count.saturating_add(1);
        }
        Ok(count)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{EsbRadio, Nrf24Error, Register};
    use crate::{
        radio::{
            prelude::EsbInit,
            rf24::{commands, mnemonics},
        },
        spi_test_expects,
        test::{mk_radio, mk_sim_radio, mk_timed_radio, SimChip},
        types::RadioMode,
    };
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
        MockError,
    };
    use std::{io::ErrorKind, vec, vec::Vec};

    const RX_CONFIG: u8 = 0x3B;
    const TX_CONFIG: u8 = 0x3A;
    const ADDRESS: [u8; 5] = [0xB1, 0xB2, 0xB3, 0xB4, 0xB5];
    const PAYLOAD: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    fn start_listening_expects() -> [SpiTransaction<u8>; 3] {
        spi_test_expects![(
            vec![Register::CONFIG.addr() | commands::W_REGISTER, RX_CONFIG],
            vec![0xEu8, 0u8],
        ),]
    }

    /// The SPI transactions of one attempt, where STATUS reads back as `status`.
    fn attempt_expects(status: u8) -> Vec<SpiTransaction<u8>> {
        let mut tx_addr = vec![Register::TX_ADDR.addr() | commands::W_REGISTER];
        tx_addr.extend_from_slice(&ADDRESS);
        let mut rx_addr_p0 = vec![Register::RX_ADDR_P0.addr() | commands::W_REGISTER];
        rx_addr_p0.extend_from_slice(&ADDRESS);
        let mut payload = vec![commands::W_TX_PAYLOAD];
        payload.extend_from_slice(&PAYLOAD);

        spi_test_expects![
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            // clear TX_DS
            (
                vec![Register::STATUS.addr() | commands::W_REGISTER, mnemonics::TX_DS],
                vec![0xEu8, 0u8],
            ),
            (tx_addr, vec![0xEu8; 6]),
            (rx_addr_p0, vec![0xEu8; 6]),
            (
                vec![Register::CONFIG.addr() | commands::W_REGISTER, TX_CONFIG],
                vec![0xEu8, 0u8],
            ),
            (payload, vec![0xEu8; 9]),
            (vec![Register::STATUS.addr(), 0xFF], vec![status, status]),
            // clear MAX_RT
            (
                vec![Register::STATUS.addr() | commands::W_REGISTER, mnemonics::MAX_RT],
                vec![status, 0u8],
            ),
        ]
        .to_vec()
    }

    fn attempt_pin_expects() -> [PinTransaction; 3] {
        [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]
    }

    #[test]
    pub fn start_listening() {
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let spi_expectations = start_listening_expects();
        // CE is asserted only after CONFIG has settled for 2 ms
        let mut mocks = mk_timed_radio(&ce_expectations, &spi_expectations, &[2]);
        let radio = &mut mocks.0;
        radio.start_listening().unwrap();
        assert!(radio.is_rx());
        assert_eq!(radio.mode(), RadioMode::Rx);
        mocks.done();
    }

    #[test]
    pub fn stop_listening() {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
        ];
        let mocks = mk_radio(&ce_expectations, &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._mode = RadioMode::Rx;
        radio.stop_listening().unwrap();
        assert!(!radio.is_rx());
        // idempotent
        radio.stop_listening().unwrap();
        assert_eq!(radio.mode(), RadioMode::Tx);
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn send_acknowledged_first_attempt() {
        let mut ce_expectations = attempt_pin_expects().to_vec();
        ce_expectations.push(PinTransaction::set(PinState::High));

        let mut spi_expectations = attempt_expects(0x2E);
        spi_expectations.extend(spi_test_expects![
            // clear TX_DS after success
            (
                vec![Register::STATUS.addr() | commands::W_REGISTER, mnemonics::TX_DS],
                vec![0x2Eu8, 0u8],
            ),
        ]);
        spi_expectations.extend(start_listening_expects());

        // 2 ms TX pulse, 4 ms ACK window, 2 ms settle back into RX
        let mut mocks = mk_timed_radio(&ce_expectations, &spi_expectations, &[2, 4, 2]);
        let radio = &mut mocks.0;
        assert_eq!(radio.send(&PAYLOAD, &ADDRESS, 3), Ok(1));
        assert!(radio.is_rx());
        mocks.done();
    }

    #[test]
    pub fn send_exhausted() {
        let mut ce_expectations = attempt_pin_expects().to_vec();
        ce_expectations.extend(attempt_pin_expects());
        ce_expectations.push(PinTransaction::set(PinState::High));

        // MAX_RT set, TX_DS clear
        let mut spi_expectations = attempt_expects(0x1E);
        spi_expectations.extend(attempt_expects(0x1E));
        spi_expectations.extend(start_listening_expects());

        // each attempt waits out its own pulse and ACK window
        let mut mocks = mk_timed_radio(&ce_expectations, &spi_expectations, &[2, 4, 2, 4, 2]);
        let radio = &mut mocks.0;
        assert_eq!(radio.send(&PAYLOAD, &ADDRESS, 2), Ok(0));
        assert!(radio.is_rx());
        mocks.done();
    }

    #[test]
    pub fn transmit_makes_one_attempt() {
        let mut ce_expectations = attempt_pin_expects().to_vec();
        ce_expectations.push(PinTransaction::set(PinState::High));

        let mut spi_expectations = attempt_expects(0x0E);
        spi_expectations.extend(start_listening_expects());

        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.transmit(&PAYLOAD, &ADDRESS).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn send_zero_attempts_is_one_attempt() {
        let mut ce_expectations = attempt_pin_expects().to_vec();
        ce_expectations.push(PinTransaction::set(PinState::High));

        let mut spi_expectations = attempt_expects(0x0E);
        spi_expectations.extend(start_listening_expects());

        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.send(&PAYLOAD, &ADDRESS, 0), Ok(0));
        spi.done();
        ce_pin.done();
    }

    fn read_parametrized(fifo_empty_after: bool) {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let mut read_payload = vec![commands::R_RX_PAYLOAD];
        read_payload.extend([0xFFu8; 8]);
        let mut response = vec![0x42u8];
        response.extend_from_slice(&PAYLOAD);
        // RX_DR set; RX_P_NO is either "empty" or pipe 1
        let status = if fifo_empty_after { 0x4E } else { 0x42 };

        let mut spi_expectations = spi_test_expects![
            (read_payload, response),
            (vec![Register::STATUS.addr(), 0xFF], vec![status, status]),
        ]
        .to_vec();
        if fifo_empty_after {
            spi_expectations.extend(spi_test_expects![(
                vec![Register::STATUS.addr() | commands::W_REGISTER, mnemonics::RX_DR],
                vec![status, 0u8],
            ),]);
        }
        spi_expectations.extend(start_listening_expects());

        // 2 ms after the payload is fetched, then 2 ms settle back into RX
        let mut mocks = mk_timed_radio(&ce_expectations, &spi_expectations, &[2, 2]);
        let radio = &mut mocks.0;
        let mut buf = [0u8; 8];
        assert_eq!(radio.read(&mut buf), Ok(8));
        assert_eq!(buf, PAYLOAD);
        assert!(radio.is_rx());
        mocks.done();
    }

    #[test]
    pub fn send_restores_rx_after_pin_error() {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High)
                .with_error(MockError::Io(ErrorKind::NotConnected)),
            PinTransaction::set(PinState::High),
        ];
        // the attempt stops at the failed TX pulse, before STATUS is read
        let mut spi_expectations = attempt_expects(0x0E)[..18].to_vec();
        spi_expectations.extend(start_listening_expects());

        let mut mocks = mk_timed_radio(&ce_expectations, &spi_expectations, &[2]);
        let radio = &mut mocks.0;
        let result = radio.send(&PAYLOAD, &ADDRESS, 3);
        assert!(matches!(result, Err(Nrf24Error::Gpo(_))));
        assert!(radio.is_rx());
        mocks.done();
    }

    #[test]
    fn read_clears_rx_dr_when_drained() {
        read_parametrized(true);
    }

    #[test]
    fn read_keeps_rx_dr_when_more_pending() {
        read_parametrized(false);
    }

    #[test]
    fn receive_without_data() {
        let spi_expectations =
            spi_test_expects![(vec![Register::STATUS.addr(), 0xFF], vec![0xEu8, 0xEu8]),];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut buf = [0u8; 8];
        assert_eq!(radio.receive(&mut buf), Ok(0));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn ack_on_second_attempt() {
        let chip = SimChip::new();
        chip.state().ack_on_attempt = Some(2);
        let mut radio = mk_sim_radio(&chip);
        radio.init(&[0x01, 0x02, 0x03, 0x04, 0x05], 8).unwrap();
        chip.state().commands.clear();

        assert_eq!(radio.send(&PAYLOAD, &ADDRESS, 3), Ok(2));

        let state = chip.state();
        let flushes = state
            .commands
            .iter()
            .filter(|cmd| **cmd == commands::FLUSH_TX)
            .count();
        assert_eq!(flushes, 2);
        assert_eq!(state.on_air.len(), 2);
        assert!(state.on_air.iter().all(|(dest, p)| *dest == ADDRESS && *p == PAYLOAD));
    }

    #[test]
    fn send_never_exceeds_max_attempts() {
        for max_attempts in 1..=4u8 {
            for ack_on in 1..=5usize {
                let chip = SimChip::new();
                chip.state().ack_on_attempt = Some(ack_on);
                let mut radio = mk_sim_radio(&chip);
                radio.init(&[0xE1; 5], 8).unwrap();
                let result = radio.send(&PAYLOAD, &ADDRESS, max_attempts).unwrap();
                if ack_on <= max_attempts as usize {
                    assert_eq!(result as usize, ack_on);
                } else {
                    assert_eq!(result, 0);
                }
                assert!(chip.state().on_air.len() <= max_attempts as usize);
            }
        }
    }

    #[test]
    fn mode_restored_after_send() {
        for ack_on in [Some(1), None] {
            let chip = SimChip::new();
            chip.state().ack_on_attempt = ack_on;
            let mut radio = mk_sim_radio(&chip);
            radio.init(&[0xE1; 5], 8).unwrap();
            radio.send(&PAYLOAD, &ADDRESS, 2).unwrap();

            assert!(radio.is_rx());
            let state = chip.state();
            assert!(state.ce);
            assert_eq!(state.regs[Register::CONFIG as usize], RX_CONFIG);
            // neither TX_DS nor MAX_RT are left set
            assert_eq!(state.regs[Register::STATUS as usize] & 0x30, 0);
        }
    }

    #[test]
    fn round_trip() {
        let sender_chip = SimChip::new();
        let receiver_chip = SimChip::new();
        sender_chip.link(&receiver_chip);
        let sender_addr = [0x01, 0x02, 0x03, 0x04, 0x05];
        let receiver_addr = [0x0A, 0x0B, 0x0C, 0x0D, 0x0E];

        for length in [1u8, 8, 32] {
            let mut sender = mk_sim_radio(&sender_chip);
            let mut receiver = mk_sim_radio(&receiver_chip);
            sender.init(&sender_addr, length).unwrap();
            receiver.init(&receiver_addr, length).unwrap();

            let payload: Vec<u8> = (0..length).map(|i| i.wrapping_mul(7) ^ 0xA5).collect();
            assert_eq!(sender.send(&payload, &receiver_addr, 3), Ok(1));

            let mut buf = [0u8; 32];
            assert_eq!(receiver.receive(&mut buf), Ok(1));
            assert_eq!(&buf[..length as usize], payload.as_slice());
        }
    }

    #[test]
    fn send_to_absent_peer_fails() {
        let sender_chip = SimChip::new();
        let receiver_chip = SimChip::new();
        sender_chip.link(&receiver_chip);
        let mut sender = mk_sim_radio(&sender_chip);
        let mut receiver = mk_sim_radio(&receiver_chip);
        sender.init(&[0x01; 5], 8).unwrap();
        receiver.init(&[0x02; 5], 8).unwrap();

        assert_eq!(sender.send(&PAYLOAD, &[0x03; 5], 3), Ok(0));
        assert_eq!(sender_chip.state().on_air.len(), 3);
        let mut buf = [0u8; 8];
        assert_eq!(receiver.receive(&mut buf), Ok(0));
    }

    #[test]
    fn receive_keeps_latest() {
        let chip = SimChip::new();
        let mut radio = mk_sim_radio(&chip);
        radio.init(&[0x01; 5], 4).unwrap();
        chip.deliver(1, &[1, 1, 1, 1]);
        chip.deliver(1, &[2, 2, 2, 2]);
        chip.deliver(1, &[3, 3, 3, 3]);

        let mut buf = [0u8; 4];
        assert_eq!(radio.receive(&mut buf), Ok(3));
        assert_eq!(buf, [3, 3, 3, 3]);
        assert!(!chip.state().rx_dr());
        assert!(radio.is_rx());
    }

    #[test]
    fn read_one_at_a_time() {
        let chip = SimChip::new();
        let mut radio = mk_sim_radio(&chip);
        radio.init(&[0x01; 5], 4).unwrap();
        chip.deliver(1, &[1, 1, 1, 1]);
        chip.deliver(1, &[2, 2, 2, 2]);

        let mut buf = [0u8; 4];
        radio.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 1, 1, 1]);
        // one payload remains, so RX_DR stays set
        assert!(chip.state().rx_dr());
        radio.read(&mut buf).unwrap();
        assert_eq!(buf, [2, 2, 2, 2]);
        assert!(!chip.state().rx_dr());
    }
}
