use core::fmt;
use core::num::NonZeroU64;

/// Stable identifier of one chart and every control attached to it.
///
/// - 1-based: the first chart of a session is `ChartId(1)`
/// - `NonZero` enables `Option<ChartId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ChartId(NonZeroU64);

impl ChartId {
    /// The identifier handed to the first chart of a session.
    pub const FIRST: ChartId = ChartId(NonZeroU64::MIN);

    /// Wrap a raw value; zero is not a valid identifier.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChartId({})", self.get())
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Derive the next chart id from the click history of every add control.
///
/// Each add event bumps exactly one counter, so the sum of all counters at
/// the moment of allocation is monotonic and never reused. Missing counts
/// are treated as zero; an empty history still yields [`ChartId::FIRST`].
pub fn next_id(prior_add_counts: &[Option<u32>]) -> ChartId {
    let total: u64 = prior_add_counts
        .iter()
        .map(|count| u64::from(count.unwrap_or(0)))
        .sum();
    ChartId::new(total).unwrap_or(ChartId::FIRST)
}

/// Monotonic counter that hands out chart ids for one session.
///
/// Never rewinds, not even when the chart collection is reset.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently issued id, if any.
    pub fn last(&self) -> Option<ChartId> {
        ChartId::new(self.last)
    }

    pub fn next(&mut self) -> ChartId {
        self.last = self.last.saturating_add(1);
        ChartId::new(self.last).unwrap_or(ChartId::FIRST)
    }

    /// Accept an externally derived id if it is ahead of everything issued
    /// so far, otherwise fall back to the next counter value.
    pub fn claim(&mut self, candidate: ChartId) -> ChartId {
        if candidate.get() > self.last {
            self.last = candidate.get();
            candidate
        } else {
            self.next()
        }
    }
}
