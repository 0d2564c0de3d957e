//! Shared access to one device instance from multiple contexts.
//!
//! The bare [`Is31fl3235a`] takes `&mut self` and is therefore exclusive by
//! construction. When several tasks or interrupt contexts drive the same
//! chip, wrap it in a [`SharedIs31fl3235a`]: every logical operation then
//! runs inside one critical section, so a read-modify-write plus its commit
//! can never interleave with another caller's and the mirror can never tear
//! against the hardware. Separate device instances need no coordination.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::device::Is31fl3235a;

/// A device instance behind a critical-section lock.
pub struct SharedIs31fl3235a<I2C, SDB, D> {
    device: Mutex<RefCell<Is31fl3235a<I2C, SDB, D>>>,
}

impl<I2C, SDB, D> core::fmt::Debug for SharedIs31fl3235a<I2C, SDB, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedIs31fl3235a").finish_non_exhaustive()
    }
}

impl<I2C, SDB, D> SharedIs31fl3235a<I2C, SDB, D> {
    /// Wraps a driver, typically right after
    /// [`initialize`](Is31fl3235a::initialize) succeeded.
    pub fn new(device: Is31fl3235a<I2C, SDB, D>) -> Self {
        Self {
            device: Mutex::new(RefCell::new(device)),
        }
    }

    /// Runs `f` with exclusive access to the device.
    ///
    /// The lock is held for the whole closure and released on every exit
    /// path, so group the steps of one logical operation (e.g. several
    /// `_no_update` writes plus the final commit) into a single call.
    /// Do not re-enter `with_device` from inside `f`.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut Is31fl3235a<I2C, SDB, D>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.device.borrow_ref_mut(cs)))
    }

    /// Unwraps the driver again.
    pub fn into_inner(self) -> Is31fl3235a<I2C, SDB, D> {
        self.device.into_inner().into_inner()
    }
}
