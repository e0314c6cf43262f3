use bitfield_struct::bitfield;

/// A typed view of the CONFIG register.
///
/// The `mask_*` fields disable the corresponding IRQ event on the IRQ pin.
/// The driver polls STATUS instead of using the IRQ pin, so TX_DS and MAX_RT
/// are masked by default.
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    #[bits(1)]
    pub mask_rx_dr: bool,

    #[bits(1, default = true)]
    pub mask_tx_ds: bool,

    #[bits(1, default = true)]
    pub mask_max_rt: bool,

    #[bits(1, default = true)]
    pub en_crc: bool,

    /// `false` for a 1 byte CRC, `true` for 2 bytes.
    #[bits(1)]
    pub crco: bool,

    #[bits(1)]
    pub power: bool,

    #[bits(1)]
    pub is_rx: bool,
}

impl Config {
    /// The powered-up, primary-receiver CONFIG value.
    pub const fn as_rx(self) -> Self {
        self.with_power(true).with_is_rx(true)
    }

    /// The powered-up, primary-transmitter CONFIG value.
    pub const fn as_tx(self) -> Self {
        self.with_power(true).with_is_rx(false)
    }
}
