//! A `no_std` driver for the Lumissil IS31FL3235A 28-channel constant-current
//! LED controller, built around a shadow register cache.
//!
//! The chip's PWM and LED control registers are write-only and
//! double-buffered: writes land in staging registers and only become visible
//! on the outputs when the update register is triggered. This crate keeps an
//! in-memory mirror of all 56 per-channel bytes, applies every mutation
//! through it, and exposes the trigger as an explicit commit.
//!
//! # Features
//!
//! - **Zero heap allocation** - fixed 28-entry mirrors, `heapless` wire frames
//! - **Synchronized updates** - burst writes over consecutive channels plus a
//!   single commit change all affected outputs at once, with no partial
//!   visibility
//! - **Write-intent caching** - the mirror always holds the last value
//!   successfully written; failed transfers leave it untouched
//! - **Per-channel control** - 8-bit duty, output enable and 1x / 1/2x /
//!   1/3x / 1/4x current scaling, with partial-field updates that preserve
//!   the other fields
//! - **Power control** - software shutdown (register) and hardware shutdown
//!   (SDB line) tracked independently
//! - **Shared access** - an optional `critical-section` handle serializing
//!   whole operations across contexts
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  staged writes   ┌─────────────────────────┐
//! │ Mutation API │─────────────────▶│ PWM 0x05..0x20 (staged) │
//! │              │                  │ CTL 0x2A..0x45 (staged) │
//! │  mirror ◀──── only on success   └───────────┬─────────────┘
//! │  (28 x PWM,  │                              │ update register 0x25
//! │   28 x CTL)  │── update() ─────────────────▶▼
//! └──────────────┘                  ┌─────────────────────────┐
//!                                   │ active registers → LEDs │
//!                                   └─────────────────────────┘
//! ```
//!
//! The mirror is authoritative: the hardware never supports reading these
//! registers back, so read-modify-write operations (scale, enable) source
//! their starting byte from the cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use is31fl3235a::prelude::*;
//!
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//! let mut led = Is31fl3235a::new(i2c, ADDR_AD_GND, delay);
//! led.initialize(PwmFrequency::ThreeKHz).unwrap();
//!
//! // Stage an RGB triple, then make it visible in one step
//! led.write_channels_no_update(0, &[255, 128, 0]).unwrap();
//! led.set_current_scale_no_update(0, CurrentScale::Half).unwrap();
//! led.update().unwrap();
//!
//! // Convenience entry points commit on their own
//! led.set_brightness(3, 200).unwrap();
//! led.set_software_shutdown(true).unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub(crate) mod cache;
pub mod device;
pub mod error;
pub mod registers;
pub mod shared;

pub use device::{ChannelState, Is31fl3235a, NoSdb};
pub use error::Error;
pub use registers::{CurrentScale, NUM_CHANNELS, PwmFrequency};
pub use shared::SharedIs31fl3235a;

pub mod prelude {
    pub use crate::device::{ChannelState, Is31fl3235a, NoSdb};
    pub use crate::error::Error;
    pub use crate::registers::{
        ADDR_AD_GND, ADDR_AD_SCL, ADDR_AD_SDA, ADDR_AD_VCC, CurrentScale, NUM_CHANNELS,
        PwmFrequency,
    };
    pub use crate::shared::SharedIs31fl3235a;
}
