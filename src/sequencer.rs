/// Token stamped on work handed to a background task. Results carrying an
/// older generation than the sequencer's current one are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    current: Generation,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate everything issued so far and hand out a fresh token.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.current
    }

    pub fn current(&self) -> Generation {
        self.current
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_invalidates_previous_tokens() {
        let mut seq = RequestSequencer::new();
        let first = seq.advance();
        assert!(seq.is_current(first));
        let second = seq.advance();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
    }
}
