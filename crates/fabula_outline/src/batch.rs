//! Round planning for continuation generation.

/// Maximum chapters generated per AI call.
pub const BATCH_SIZE: i32 = 5;

/// One planned generation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRound {
    /// 0-based round number
    pub index: usize,
    /// Total rounds in the plan
    pub total_rounds: usize,
    /// Chapters this round generates
    pub size: i32,
    /// 1-based number of the first chapter this round produces
    pub start_chapter: i32,
}

impl BatchRound {
    /// 1-based number of the last chapter this round produces.
    pub fn end_chapter(&self) -> i32 {
        self.start_chapter + self.size - 1
    }
}

/// Fixed-size rounds covering a requested chapter count.
///
/// Each round is at most [`BATCH_SIZE`] chapters; the final round absorbs the
/// remainder and a zero-size round is never planned. Start chapters continue
/// numbering from the last existing chapter, so the plan's rounds cover a
/// contiguous range.
///
/// # Examples
///
/// ```
/// use fabula_outline::BatchPlan;
///
/// let plan = BatchPlan::new(12, 0);
/// let sizes: Vec<i32> = plan.rounds().iter().map(|r| r.size).collect();
/// assert_eq!(sizes, [5, 5, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    rounds: Vec<BatchRound>,
}

impl BatchPlan {
    /// Plan rounds for `total_requested` chapters following
    /// `last_existing_chapter`. A non-positive request plans nothing.
    pub fn new(total_requested: i32, last_existing_chapter: i32) -> Self {
        if total_requested <= 0 {
            return Self { rounds: Vec::new() };
        }
        // div_ceil is only stable on unsigned types; the guard above makes
        // the casts lossless.
        let total_rounds = (total_requested as usize).div_ceil(BATCH_SIZE as usize);
        let mut rounds = Vec::with_capacity(total_rounds);
        let mut planned = 0;
        for index in 0..total_rounds {
            let size = (total_requested - planned).min(BATCH_SIZE);
            rounds.push(BatchRound {
                index,
                total_rounds,
                size,
                start_chapter: last_existing_chapter + 1 + planned,
            });
            planned += size;
        }
        Self { rounds }
    }

    /// Planned rounds in execution order.
    pub fn rounds(&self) -> &[BatchRound] {
        &self.rounds
    }

    /// Number of planned rounds.
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Total chapters the plan covers.
    pub fn total_chapters(&self) -> i32 {
        self.rounds.iter().map(|round| round.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_chapters_split_into_5_5_2() {
        let plan = BatchPlan::new(12, 0);
        let sizes: Vec<i32> = plan.rounds().iter().map(|r| r.size).collect();
        assert_eq!(sizes, [5, 5, 2]);
        assert_eq!(plan.total_rounds(), 3);
        assert_eq!(plan.total_chapters(), 12);
    }

    #[test]
    fn exact_multiple_has_no_short_round() {
        let plan = BatchPlan::new(10, 0);
        let sizes: Vec<i32> = plan.rounds().iter().map(|r| r.size).collect();
        assert_eq!(sizes, [5, 5]);
    }

    #[test]
    fn small_request_is_a_single_round() {
        let plan = BatchPlan::new(3, 0);
        assert_eq!(plan.total_rounds(), 1);
        assert_eq!(plan.rounds()[0].size, 3);
    }

    #[test]
    fn round_count_rounds_up_at_batch_boundaries() {
        for (requested, rounds) in [(1, 1), (4, 1), (5, 1), (6, 2), (10, 2), (11, 3)] {
            assert_eq!(
                BatchPlan::new(requested, 0).total_rounds(),
                rounds,
                "requested {requested}"
            );
        }
    }

    #[test]
    fn zero_request_plans_nothing() {
        assert!(BatchPlan::new(0, 7).rounds().is_empty());
        assert!(BatchPlan::new(-2, 7).rounds().is_empty());
    }

    #[test]
    fn rounds_continue_from_existing_chapters() {
        let plan = BatchPlan::new(7, 3);
        let rounds = plan.rounds();
        assert_eq!(rounds[0].start_chapter, 4);
        assert_eq!(rounds[0].end_chapter(), 8);
        assert_eq!(rounds[1].start_chapter, 9);
        assert_eq!(rounds[1].end_chapter(), 10);
    }

    #[test]
    fn rounds_cover_a_contiguous_range() {
        let plan = BatchPlan::new(23, 11);
        let mut expected_start = 12;
        for round in plan.rounds() {
            assert_eq!(round.start_chapter, expected_start);
            expected_start = round.end_chapter() + 1;
        }
        assert_eq!(expected_start, 12 + 23);
    }
}
