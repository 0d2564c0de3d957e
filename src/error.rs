/// Errors that can occur during driver operations.
///
/// `BusE` is the I2C transport's error type, `PinE` the SDB line's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<BusE, PinE> {
    /// Channel index or range exceeds the 28 available channels.
    OutOfRange,
    /// Malformed argument, e.g. a brightness percentage above 100 or an
    /// empty value slice.
    InvalidArgument,
    /// The underlying I2C write failed. The register cache is left
    /// untouched on this path.
    Bus(BusE),
    /// Driving the SDB line failed.
    Pin(PinE),
    /// Hardware shutdown was requested but no SDB line is configured.
    NotSupported,
    /// Operation invoked before [`initialize`](crate::Is31fl3235a::initialize)
    /// completed successfully.
    NotReady,
}

impl<BusE, PinE> core::fmt::Display for Error<BusE, PinE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OutOfRange => write!(f, "channel index or range exceeds 28 channels"),
            Error::InvalidArgument => write!(f, "malformed argument"),
            Error::Bus(_) => write!(f, "bus transport failure"),
            Error::Pin(_) => write!(f, "shutdown line failure"),
            Error::NotSupported => write!(f, "no shutdown line configured"),
            Error::NotReady => write!(f, "device not initialized"),
        }
    }
}
