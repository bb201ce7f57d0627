/// Near-end-of-list predicate evaluated by the rendering layer.
///
/// The sentinel sits after the last item; it counts as visible once the last
/// visible row is within `prefetch_distance` rows of the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfListProbe {
    prefetch_distance: usize,
}

impl Default for EndOfListProbe {
    fn default() -> Self {
        Self::new(3)
    }
}

impl EndOfListProbe {
    pub fn new(prefetch_distance: usize) -> Self {
        Self { prefetch_distance }
    }

    /// `last_visible` is the index of the last rendered row on screen.
    pub fn near_end(&self, last_visible: Option<usize>, item_count: usize) -> bool {
        if item_count == 0 {
            return true;
        }
        match last_visible {
            Some(index) => index.saturating_add(self.prefetch_distance) + 1 >= item_count,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_end() {
        let probe = EndOfListProbe::new(2);
        assert!(probe.near_end(None, 0));
        assert!(!probe.near_end(None, 10));
        assert!(!probe.near_end(Some(6), 10));
        assert!(probe.near_end(Some(7), 10));
        assert!(probe.near_end(Some(9), 10));
    }

    #[test]
    fn test_zero_distance_requires_last_row() {
        let probe = EndOfListProbe::new(0);
        assert!(!probe.near_end(Some(8), 10));
        assert!(probe.near_end(Some(9), 10));
    }
}
