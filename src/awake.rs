//! Keeping the display on while words are flashing.

use thiserror::Error;

/// Token for one acquired stay-awake lock.
#[derive(Debug, PartialEq, Eq)]
pub struct WakeHandle(u64);

impl WakeHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Error, Debug)]
#[error("stay-awake unavailable: {0}")]
pub struct StayAwakeError(pub String);

/// Platform capability that keeps the screen from sleeping.
///
/// Acquisition is best effort; callers treat an error as "not held".
pub trait StayAwake {
    fn acquire(&mut self) -> Result<WakeHandle, StayAwakeError>;

    fn release(&mut self, handle: WakeHandle);
}

/// Hands out handles without touching any platform API.
#[derive(Debug, Default)]
pub struct NoopStayAwake {
    next: u64,
}

impl StayAwake for NoopStayAwake {
    fn acquire(&mut self) -> Result<WakeHandle, StayAwakeError> {
        self.next += 1;
        Ok(WakeHandle(self.next))
    }

    fn release(&mut self, _handle: WakeHandle) {}
}
