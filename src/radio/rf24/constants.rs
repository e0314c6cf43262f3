/// The nRF24L01 register map.
///
/// This is a closed set. The 5-bit wire address of each register is its discriminant.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    CONFIG = 0x00,
    EN_AA = 0x01,
    EN_RXADDR = 0x02,
    SETUP_AW = 0x03,
    SETUP_RETR = 0x04,
    RF_CH = 0x05,
    RF_SETUP = 0x06,
    STATUS = 0x07,
    OBSERVE_TX = 0x08,
    CD = 0x09,
    RX_ADDR_P0 = 0x0A,
    RX_ADDR_P1 = 0x0B,
    RX_ADDR_P2 = 0x0C,
    RX_ADDR_P3 = 0x0D,
    RX_ADDR_P4 = 0x0E,
    RX_ADDR_P5 = 0x0F,
    TX_ADDR = 0x10,
    RX_PW_P0 = 0x11,
    RX_PW_P1 = 0x12,
    RX_PW_P2 = 0x13,
    RX_PW_P3 = 0x14,
    RX_PW_P4 = 0x15,
    RX_PW_P5 = 0x16,
    FIFO_STATUS = 0x17,
}

impl Register {
    /// Only the lower 5 bits of a command byte select a register.
    pub const MASK: u8 = 0x1F;

    /// The register's address as used in the R_REGISTER/W_REGISTER command bytes.
    pub const fn addr(self) -> u8 {
        self as u8 & Self::MASK
    }
}

/// SPI command bytes for the nRF24L01.
pub mod commands {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

/// Bit masks for the fields this driver touches.
pub mod mnemonics {
    // CONFIG
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
    pub const EN_CRC: u8 = 1 << 3;
    pub const CRCO: u8 = 1 << 2;
    pub const PWR_UP: u8 = 1 << 1;
    pub const PRIM_RX: u8 = 1;

    // EN_AA
    pub const ENAA_P0: u8 = 1;
    pub const ENAA_P1: u8 = 1 << 1;

    // STATUS
    pub const RX_DR: u8 = 1 << 6;
    pub const TX_DS: u8 = 1 << 5;
    pub const MAX_RT: u8 = 1 << 4;
    pub const RX_P_NO: u8 = 0b111 << 1;
    pub const TX_FULL: u8 = 1;

    // FIFO_STATUS
    pub const FIFO_TX_FULL: u8 = 1 << 5;
    pub const TX_EMPTY: u8 = 1 << 4;
    pub const RX_FULL: u8 = 1 << 1;
    pub const RX_EMPTY: u8 = 1;
}

/// Fixed settle windows (in milliseconds) the chip needs between steps.
pub mod timing {
    /// After the radio first receives power, before any register write sticks.
    pub const POWER_ON_SETTLE_MS: u32 = 100;
    /// Between writing CONFIG (PWR_UP/PRIM_RX) and asserting CE.
    pub const MODE_SETTLE_MS: u32 = 2;
    /// How long CE stays high to fire one transmission.
    pub const TX_PULSE_MS: u32 = 2;
    /// Grace period for an auto-ACK to arrive after the CE pulse.
    pub const ACK_WINDOW_MS: u32 = 4;
    /// After reading a payload, before inspecting what remains in the RX FIFO.
    pub const READ_SETTLE_MS: u32 = 2;
}
