use crate::radio::rf24::MAX_PAYLOAD_LENGTH;

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use rf24_link::radio::RadioConfig;
///
/// let config = RadioConfig::default()
///     .with_rx_address(&[1, 2, 3, 4, 5])
///     .with_payload_length(16);
/// assert_eq!(config.payload_length(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    rx_address: [u8; 5],
    payload_length: u8,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::rx_address()`] | `[0xC2; 5]` (the chip's reset value for pipe 1) |
    /// | [`RadioConfig::payload_length()`] | `8` |
    fn default() -> Self {
        Self {
            rx_address: [0xC2; 5],
            payload_length: 8,
        }
    }
}

impl RadioConfig {
    /// The address this node listens on (pipe 1).
    pub const fn rx_address(&self) -> [u8; 5] {
        self.rx_address
    }

    /// Set the address this node listens on (pipe 1).
    pub fn with_rx_address(self, address: &[u8; 5]) -> Self {
        Self {
            rx_address: *address,
            ..self
        }
    }

    /// The static payload length used for every packet sent or received.
    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// Set the static payload length.
    ///
    /// The given `length` is clamped to the range [1, 32].
    pub fn with_payload_length(self, length: u8) -> Self {
        Self {
            payload_length: length.clamp(1, MAX_PAYLOAD_LENGTH),
            ..self
        }
    }
}
