//! Request tokens
//!
//! Every content request and every close issues a new token. A completion is
//! applied only while its token is still the latest one.

use std::fmt;

/// Monotonic token identifying one overlay request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request tokens and answers whether one is still current
#[derive(Debug, Default)]
pub struct Sequencer {
    last: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token the next `issue` will return, without invalidating anything
    pub fn peek(&self) -> RequestToken {
        RequestToken(self.last + 1)
    }

    pub fn issue(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.last
    }

    pub fn latest(&self) -> Option<RequestToken> {
        (self.last > 0).then_some(RequestToken(self.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_is_current() {
        let mut seq = Sequencer::new();
        assert!(seq.latest().is_none());

        let a = seq.issue();
        assert!(seq.is_current(a));

        let b = seq.issue();
        assert!(b > a);
        assert!(!seq.is_current(a));
        assert!(seq.is_current(b));
        assert_eq!(seq.latest(), Some(b));
    }

    #[test]
    fn test_peek_does_not_invalidate() {
        let mut seq = Sequencer::new();
        let a = seq.issue();
        let next = seq.peek();
        assert!(seq.is_current(a));
        assert_eq!(seq.issue(), next);
        assert!(!seq.is_current(a));
    }
}
