use alloc::collections::VecDeque;

/// A degraded condition the view recovered from by substitution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// The column width provider returned a non-positive or NaN width.
    InvalidColumnWidth { column: usize, width: f64 },
    /// The row height provider returned a non-positive or NaN height.
    InvalidRowHeight { row: usize, height: f64 },
    /// Every loaded item in the column had a non-positive implicit width.
    ZeroImplicitWidth { column: usize },
    /// Every loaded item in the row had a non-positive implicit height.
    ZeroImplicitHeight { row: usize },
    /// The factory could not produce an item; the cell shows an empty placeholder.
    PlaceholderSubstituted { index: usize, unusable: bool },
}

/// Bounded log of [`Diagnostic`]s, oldest dropped first.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
    dropped: usize,
}

impl Diagnostics {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        self.entries.push_back(diagnostic);
    }

    /// Recorded entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Diagnostic> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.entries.contains(diagnostic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many entries were evicted to stay within capacity.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
