//! Round and half start markers used for navigation

/// Which marker list a jump uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Round,
    Half,
}

/// Frame indices where rounds and halves start.
///
/// Both lists are strictly increasing. `round_starts` always begins with 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryIndex {
    round_starts: Vec<usize>,
    half_starts: Vec<usize>,
}

impl Default for BoundaryIndex {
    fn default() -> Self {
        Self {
            round_starts: vec![0],
            half_starts: Vec::new(),
        }
    }
}

impl BoundaryIndex {
    /// Record a round start; returns false when it would not extend the list
    pub fn push_round(&mut self, frame: usize) -> bool {
        push_increasing(&mut self.round_starts, frame)
    }

    /// Record a half start; returns false when it would not extend the list
    pub fn push_half(&mut self, frame: usize) -> bool {
        push_increasing(&mut self.half_starts, frame)
    }

    pub fn round_starts(&self) -> &[usize] {
        &self.round_starts
    }

    pub fn half_starts(&self) -> &[usize] {
        &self.half_starts
    }

    pub fn markers(&self, kind: BoundaryKind) -> &[usize] {
        match kind {
            BoundaryKind::Round => &self.round_starts,
            BoundaryKind::Half => &self.half_starts,
        }
    }

    /// 1-based number of the round containing `frame`
    pub fn round_number(&self, frame: usize) -> usize {
        self.round_starts.partition_point(|&start| start <= frame).max(1)
    }

    /// Target of a jump to the previous boundary, if there is one.
    ///
    /// Within half a second after a boundary, the jump skips past it to the
    /// one before, so repeated presses keep moving back.
    pub fn previous(&self, kind: BoundaryKind, current: usize, frame_rate_rounded: usize) -> Option<usize> {
        previous_marker(self.markers(kind), current, frame_rate_rounded / 2)
    }

    /// Target of a jump to the next boundary, if there is one
    pub fn next(&self, kind: BoundaryKind, current: usize) -> Option<usize> {
        self.markers(kind).iter().copied().find(|&m| m > current)
    }
}

fn push_increasing(markers: &mut Vec<usize>, frame: usize) -> bool {
    if markers.last().is_some_and(|&last| frame <= last) {
        return false;
    }
    markers.push(frame);
    true
}

fn previous_marker(markers: &[usize], current: usize, hysteresis: usize) -> Option<usize> {
    match markers.iter().position(|&m| m > current) {
        Some(0) => None,
        Some(i) => {
            if i > 1 && current < markers[i - 1] + hysteresis {
                Some(markers[i - 2])
            } else {
                Some(markers[i - 1])
            }
        }
        None => {
            let len = markers.len();
            let last = *markers.last()?;
            if len > 1 && current < last + hysteresis {
                Some(markers[len - 2])
            } else {
                Some(last)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(rounds: &[usize], halves: &[usize]) -> BoundaryIndex {
        let mut index = BoundaryIndex::default();
        for &r in rounds {
            index.push_round(r);
        }
        for &h in halves {
            index.push_half(h);
        }
        index
    }

    #[test]
    fn test_round_starts_seeded_and_increasing() {
        let mut index = BoundaryIndex::default();
        assert_eq!(index.round_starts(), &[0]);
        assert!(!index.push_round(0));
        assert!(index.push_round(300));
        assert!(!index.push_round(300));
        assert!(!index.push_round(120));
        assert!(index.push_round(700));
        assert_eq!(index.round_starts(), &[0, 300, 700]);

        assert!(index.push_half(0));
        assert!(!index.push_half(0));
        assert_eq!(index.half_starts(), &[0]);
    }

    #[test]
    fn test_previous_round_with_hysteresis() {
        let index = index(&[300, 700], &[]);
        // 705 is within half a second of 700, so 700 is skipped
        assert_eq!(index.previous(BoundaryKind::Round, 705, 64), Some(300));
        assert_eq!(index.previous(BoundaryKind::Round, 732, 64), Some(700));
        assert_eq!(index.previous(BoundaryKind::Round, 500, 64), Some(300));
        assert_eq!(index.previous(BoundaryKind::Round, 310, 64), Some(0));
        assert_eq!(index.previous(BoundaryKind::Round, 100, 64), Some(0));
        assert_eq!(index.previous(BoundaryKind::Round, 0, 64), Some(0));
    }

    #[test]
    fn test_double_press_moves_back_twice() {
        let index = index(&[300, 700], &[]);
        let first = index.previous(BoundaryKind::Round, 705, 64).unwrap();
        let second = index.previous(BoundaryKind::Round, first, 64).unwrap();
        assert_eq!((first, second), (300, 0));
        assert!(second < first && first < 705);
    }

    #[test]
    fn test_previous_without_earlier_marker() {
        let index = index(&[], &[500, 900]);
        assert_eq!(index.previous(BoundaryKind::Half, 100, 64), None);
        assert_eq!(index.previous(BoundaryKind::Half, 510, 64), Some(500));
        assert_eq!(index.previous(BoundaryKind::Half, 910, 64), Some(500));

        let empty = BoundaryIndex::default();
        assert_eq!(empty.previous(BoundaryKind::Half, 100, 64), None);
        assert_eq!(empty.next(BoundaryKind::Half, 100), None);
    }

    #[test]
    fn test_next() {
        let index = index(&[300, 700], &[650]);
        assert_eq!(index.next(BoundaryKind::Round, 0), Some(300));
        assert_eq!(index.next(BoundaryKind::Round, 300), Some(700));
        assert_eq!(index.next(BoundaryKind::Round, 700), None);
        assert_eq!(index.next(BoundaryKind::Half, 10), Some(650));
    }

    #[test]
    fn test_round_number() {
        let index = index(&[300, 700], &[]);
        assert_eq!(index.round_number(0), 1);
        assert_eq!(index.round_number(299), 1);
        assert_eq!(index.round_number(300), 2);
        assert_eq!(index.round_number(999), 3);
    }
}
