// Jobs and job chains.
//
// A `Job` is one unit of pawn work: walk somewhere, sleep, eat an item,
// pick items up from a structure, or work an activity on a structure. Jobs
// are grouped into a `JobChain`, an owned sequence a pawn executes front to
// back (typically `[Withdraw.., Work]` built by `assignment.rs`). Advancing
// past the last job ends the chain. There are no successor links, so a
// chain is always finite and can never loop back on itself.
//
// Jobs live in three places: the global queue on `SimState` (unclaimed
// WORK jobs), each pawn's personal FIFO queue, and each pawn's current
// chain.
//
// See also: `assignment.rs` for building chains, `pawn_sim.rs` for
// executing them, `structure_sim.rs` which advances chains when
// withdrawals and activities finish.

use crate::catalog::ItemList;
use crate::prng::GameRng;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobKind {
    /// Walk to a cell.
    Move { dest: GridCoord },
    /// Perform an activity on a structure, `repeats` times.
    Work {
        target: StructureId,
        activity: ActivityId,
        repeats: u32,
    },
    /// Pick items up from a structure's inventory.
    Withdraw { source: StructureId, items: ItemList },
    /// Sleep on the spot until fully rested.
    Sleep,
    /// Eat one unit of an item from the pawn's own inventory.
    Eat { item: ItemKind },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
}

impl Job {
    pub fn new(rng: &mut GameRng, kind: JobKind) -> Self {
        Self {
            id: JobId::new(rng),
            kind,
        }
    }

    pub fn work(
        rng: &mut GameRng,
        target: StructureId,
        activity: ActivityId,
        repeats: u32,
    ) -> Self {
        Self::new(
            rng,
            JobKind::Work {
                target,
                activity,
                repeats: repeats.max(1),
            },
        )
    }

    /// The structure this job acts on, if any.
    pub fn target(&self) -> Option<StructureId> {
        match &self.kind {
            JobKind::Work { target, .. } => Some(*target),
            JobKind::Withdraw { source, .. } => Some(*source),
            JobKind::Move { .. } | JobKind::Sleep | JobKind::Eat { .. } => None,
        }
    }

    /// `(target, activity)` for WORK jobs.
    pub fn work_target(&self) -> Option<(StructureId, ActivityId)> {
        match &self.kind {
            JobKind::Work {
                target, activity, ..
            } => Some((*target, *activity)),
            _ => None,
        }
    }

    pub fn is_sleep(&self) -> bool {
        matches!(self.kind, JobKind::Sleep)
    }

    pub fn is_eat(&self) -> bool {
        matches!(self.kind, JobKind::Eat { .. })
    }
}

/// A pawn's current sequence of jobs. Always holds at least one job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobChain {
    current: Job,
    rest: VecDeque<Job>,
}

impl JobChain {
    pub fn new(first: Job) -> Self {
        Self {
            current: first,
            rest: VecDeque::new(),
        }
    }

    /// Build a chain from a sequence, or `None` if it is empty.
    pub fn from_jobs(jobs: impl IntoIterator<Item = Job>) -> Option<Self> {
        let mut iter = jobs.into_iter();
        let current = iter.next()?;
        Some(Self {
            current,
            rest: iter.collect(),
        })
    }

    /// Append a job to the end of the chain.
    pub fn then(mut self, job: Job) -> Self {
        self.rest.push_back(job);
        self
    }

    pub fn current(&self) -> &Job {
        &self.current
    }

    pub fn upcoming(&self) -> Option<&Job> {
        self.rest.front()
    }

    /// Move to the next job. Returns `false` when the chain is finished; the
    /// caller then drops it.
    pub fn advance(&mut self) -> bool {
        match self.rest.pop_front() {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        std::iter::once(&self.current).chain(self.rest.iter())
    }
}
