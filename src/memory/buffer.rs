//! Typed working registers with occupancy and busy state

use serde::Serialize;

use crate::core::error::{Result, SimonError};

/// Identifies one outstanding request; completions carrying a stale token are void
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Occupancy {
    Empty,
    Requested,
    Full,
}

/// A single-slot record filled asynchronously by its module
#[derive(Debug, Clone)]
pub struct Buffer<T> {
    name: &'static str,
    chunk: Option<T>,
    pending: Option<RequestToken>,
    failed: bool,
}

impl<T> Buffer<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            chunk: None,
            pending: None,
            failed: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn occupancy(&self) -> Occupancy {
        if self.pending.is_some() {
            Occupancy::Requested
        } else if self.chunk.is_some() {
            Occupancy::Full
        } else {
            Occupancy::Empty
        }
    }

    /// Start a request: the record empties and stays busy until completion
    pub fn request(&mut self, token: RequestToken) -> Result<()> {
        if self.is_busy() {
            return Err(SimonError::RecordBusy(self.name));
        }
        self.chunk = None;
        self.failed = false;
        self.pending = Some(token);
        Ok(())
    }

    /// Fill the record if `token` is still the outstanding request
    pub fn complete(&mut self, token: RequestToken, chunk: T) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        self.chunk = Some(chunk);
        true
    }

    /// Mark the outstanding request as failed; the record stays empty
    pub fn fail(&mut self, token: RequestToken) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        self.failed = true;
        true
    }

    /// Abort the outstanding request, voiding its completion
    pub fn cancel(&mut self) -> Option<RequestToken> {
        self.pending.take()
    }

    /// Write a chunk directly, without a module request
    pub fn set(&mut self, chunk: T) {
        self.chunk = Some(chunk);
        self.failed = false;
    }

    /// Return to empty, cancelling anything outstanding
    pub fn clear(&mut self) {
        self.pending = None;
        self.chunk = None;
        self.failed = false;
    }

    pub fn read(&self) -> Option<&T> {
        self.chunk.as_ref()
    }

    pub fn read_mut(&mut self) -> Option<&mut T> {
        self.chunk.as_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_free(&self) -> bool {
        !self.is_busy()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy() == Occupancy::Empty
    }

    pub fn is_full(&self) -> bool {
        self.occupancy() == Occupancy::Full
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_then_complete() {
        let mut buffer: Buffer<u32> = Buffer::new("retrieval");
        assert!(buffer.is_empty() && buffer.is_free());

        buffer.request(RequestToken(1)).unwrap();
        assert_eq!(buffer.occupancy(), Occupancy::Requested);
        assert!(buffer.is_busy());
        assert!(buffer.read().is_none());

        assert!(buffer.complete(RequestToken(1), 5));
        assert!(buffer.is_full() && buffer.is_free());
        assert_eq!(buffer.read(), Some(&5));
    }

    #[test]
    fn test_busy_request_is_rejected() {
        let mut buffer: Buffer<u32> = Buffer::new("visual");
        buffer.request(RequestToken(1)).unwrap();
        let err = buffer.request(RequestToken(2)).unwrap_err();
        assert!(matches!(err, SimonError::RecordBusy("visual")));
    }

    #[test]
    fn test_cancel_voids_completion() {
        let mut buffer: Buffer<u32> = Buffer::new("retrieval");
        buffer.request(RequestToken(4)).unwrap();
        assert_eq!(buffer.cancel(), Some(RequestToken(4)));
        assert!(!buffer.complete(RequestToken(4), 9));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_failure_is_flagged_until_next_request() {
        let mut buffer: Buffer<u32> = Buffer::new("retrieval");
        buffer.request(RequestToken(1)).unwrap();
        assert!(buffer.fail(RequestToken(1)));
        assert!(buffer.is_failed() && buffer.is_empty() && buffer.is_free());

        buffer.request(RequestToken(2)).unwrap();
        assert!(!buffer.is_failed());
    }
}
