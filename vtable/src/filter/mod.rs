//! The sort → search → selection → advanced pipeline.
//!
//! Each stage is a pure `rows -> rows` transform over indexes into the source slice. The
//! [`Pipeline`] caches every stage's output so a criterion change re-runs only that stage and
//! the ones after it.

mod advanced;
mod search;
mod selection;
mod sort;

use alloc::vec::Vec;

pub use advanced::{AdvancedCriterion, AdvancedFilter, FilterOperator};
pub use search::SearchFilter;
pub use selection::SelectionFilter;
pub use sort::{SortDirection, SortState};

use crate::{Record, ServerDelegation};

/// One pipeline stage, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Stage {
    Sort = 0,
    Search = 1,
    Selection = 2,
    Advance = 3,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Self::Sort, Self::Search, Self::Selection, Self::Advance];

    fn from_index(i: usize) -> Self {
        Self::ALL[i]
    }
}

const STAGES: usize = Stage::ALL.len();

/// Criteria of all four stages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub sort: SortState,
    pub search: SearchFilter,
    pub selection: SelectionFilter,
    pub advance: AdvancedFilter,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        !self.sort.is_active()
            && self.search.is_empty()
            && self.selection.is_empty()
            && self.advance.is_empty()
    }

    pub fn clear(&mut self) {
        self.sort.clear();
        self.search.clear();
        self.selection.clear();
        self.advance.clear();
    }

    /// Runs a single stage locally.
    pub fn apply_stage<T: Record>(&self, stage: Stage, data: &[T], rows: &[usize]) -> Vec<usize> {
        match stage {
            Stage::Sort => self.sort.apply(data, rows),
            Stage::Search => self.search.apply(data, rows),
            Stage::Selection => self.selection.apply(data, rows),
            Stage::Advance => self.advance.apply(data, rows),
        }
    }

    /// Runs the whole pipeline without caching.
    pub fn apply<T: Record>(&self, data: &[T], server: ServerDelegation) -> Vec<usize> {
        let mut rows: Vec<usize> = (0..data.len()).collect();
        for stage in Stage::ALL {
            if !server.delegates(stage) {
                rows = self.apply_stage(stage, data, &rows);
            }
        }
        rows
    }
}

/// Cached stage outputs.
///
/// `valid` counts the leading stages whose cached output is current.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    outputs: [Vec<usize>; STAGES],
    valid: usize,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `stage` and every later stage stale.
    pub fn invalidate(&mut self, stage: Stage) {
        self.valid = self.valid.min(stage as usize);
    }

    pub fn invalidate_all(&mut self) {
        self.valid = 0;
    }

    pub fn is_fresh(&self) -> bool {
        self.valid == STAGES
    }

    /// Final output of the last run.
    pub fn rows(&self) -> &[usize] {
        &self.outputs[STAGES - 1]
    }

    /// Output of `stage` as of the last run.
    pub fn stage_rows(&self, stage: Stage) -> &[usize] {
        &self.outputs[stage as usize]
    }

    /// Re-runs stale stages. Returns `true` if anything was recomputed.
    pub fn run<T: Record>(
        &mut self,
        data: &[T],
        state: &FilterState,
        server: ServerDelegation,
    ) -> bool {
        if self.valid == STAGES {
            return false;
        }
        let first = self.valid;
        for i in first..STAGES {
            let stage = Stage::from_index(i);
            let out = {
                let identity;
                let input: &[usize] = if i == 0 {
                    identity = (0..data.len()).collect::<Vec<usize>>();
                    &identity
                } else {
                    &self.outputs[i - 1]
                };
                if server.delegates(stage) {
                    input.to_vec()
                } else {
                    state.apply_stage(stage, data, input)
                }
            };
            self.outputs[i] = out;
        }
        self.valid = STAGES;
        vdebug!(
            from = ?Stage::from_index(first),
            rows = self.rows().len(),
            "pipeline recomputed"
        );
        true
    }
}
