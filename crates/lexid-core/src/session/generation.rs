//! Per-operation request generations for latest-result-wins safety.
//!
//! Overlapping async submissions of the same logical operation would
//! otherwise race, with whichever response resolves last clobbering shared
//! state. Each dispatch is stamped; only the newest stamp may settle.

/// Generation stamp handed to an in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Monotonic generation counter for one logical operation.
#[derive(Debug, Default)]
pub struct OpGenerations {
    next: u64,
    current: Option<Generation>,
}

impl OpGenerations {
    /// Stamps a new in-flight request, superseding any earlier one.
    pub fn begin(&mut self) -> Generation {
        let generation = Generation(self.next);
        self.next += 1;
        self.current = Some(generation);
        generation
    }

    /// Invalidates whatever is in flight.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Returns true if the stamp is still the newest dispatched request.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == Some(generation)
    }

    /// Consumes the in-flight slot if the stamp is still newest.
    /// Returns false for stale results, which the caller must discard.
    pub fn settle(&mut self, generation: Generation) -> bool {
        if self.is_current(generation) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
