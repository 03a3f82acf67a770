//! Resumable, externally-driven execution of the digest algorithm.
//!
//! The compression loop is an inherently tight 64-iteration loop. For
//! instructional inspection it is remodelled here as an explicit state
//! machine: a [`Stepper`] holds the running registers, the fully padded
//! block sequence, and two cursors (block index, step index). Every
//! [`Stepper::advance`] call performs exactly one transition:
//!
//! - one compression step, returning the post-step registers and every
//!   intermediate the step computed,
//! - or a block boundary, folding the working registers into the running
//!   state,
//! - or completion, yielding the final [`Digest`].
//!
//! Advancing a completed session is a benign no-op. A session may be dropped
//! at any point; it holds nothing beyond in-memory buffers. Sessions are
//! strictly sequential and must not be advanced from two call sites at once.

use crate::block::{self, INIT};
use crate::padding::pad_message;
use crate::Digest;

/// One recorded compression step.
///
/// Together with the block boundary fold, the records reproduce every
/// intermediate value a full non-stepped run computes internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// Index of the block being compressed, starting at 0.
    pub block_index: usize,
    /// Total number of padded blocks in the session.
    pub total_blocks: usize,
    /// Overall step index within the block, 0 through 63.
    pub step_index: usize,
    /// Active round, 1 through 4.
    pub round: u8,
    /// Step number within the round, 1 through 16.
    pub step_in_round: u8,
    /// Working registers A, B, C, D after the step.
    pub registers: [u32; 4],
    /// Output of the round's nonlinear function.
    pub f: u32,
    /// Index of the message word mixed into the step.
    pub word_index: usize,
    /// The additive sum before rotation.
    pub unrotated: u32,
}

/// Result of a single [`Stepper::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One compression step was executed.
    Step(StepRecord),
    /// All 64 steps of a block are done; the working registers were folded
    /// into the running state.
    BlockBoundary {
        /// Index of the block that finished.
        block_index: usize,
        /// Running registers after the fold.
        registers: [u32; 4],
    },
    /// Every block has been consumed; the digest is final.
    Completed(Digest),
    /// The session had already completed; nothing happened.
    AlreadyCompleted,
}

/// A resumable digest computation advancing one sub-step per call.
#[derive(Clone, Debug)]
pub struct Stepper {
    state: [u32; 4],
    working: [u32; 4],
    blocks: Vec<[u32; 16]>,
    block_index: usize,
    step_index: usize,
    completed: bool,
}

impl Stepper {
    /// Creates a session over `data`, padding the whole message up front.
    ///
    /// Padding guarantees at least one block, so even an empty input yields
    /// 64 steps before completion.
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self {
            state: INIT,
            working: INIT,
            blocks: pad_message(data),
            block_index: 0,
            step_index: 0,
            completed: false,
        }
    }

    /// Total number of padded blocks in the session.
    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Index of the block the next step will operate on.
    #[must_use]
    pub const fn block_index(&self) -> usize {
        self.block_index
    }

    /// Step cursor within the current block, 0 through 63 (64 when the block
    /// awaits its boundary fold).
    #[must_use]
    pub const fn step_index(&self) -> usize {
        self.step_index
    }

    /// Whether the session has produced its final digest.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Live working registers A, B, C, D.
    #[must_use]
    pub const fn registers(&self) -> [u32; 4] {
        self.working
    }

    /// Performs exactly one transition of the state machine.
    pub fn advance(&mut self) -> StepOutcome {
        if self.completed {
            return StepOutcome::AlreadyCompleted;
        }

        if self.block_index == self.blocks.len() {
            self.completed = true;
            return StepOutcome::Completed(Digest::from_state(self.state));
        }

        if self.step_index == 64 {
            for (register, value) in self.state.iter_mut().zip(self.working) {
                *register = register.wrapping_add(value);
            }
            let block_index = self.block_index;
            self.block_index += 1;
            self.step_index = 0;
            return StepOutcome::BlockBoundary {
                block_index,
                registers: self.state,
            };
        }

        if self.step_index == 0 {
            self.working = self.state;
        }

        let index = self.step_index;
        let detail = block::step(&mut self.working, &self.blocks[self.block_index], index);
        self.step_index += 1;

        StepOutcome::Step(StepRecord {
            block_index: self.block_index,
            total_blocks: self.blocks.len(),
            step_index: index,
            round: detail.round,
            step_in_round: (index % 16 + 1) as u8,
            registers: self.working,
            f: detail.f,
            word_index: detail.word_index,
            unrotated: detail.unrotated,
        })
    }

    /// Drives the session until [`StepOutcome::Completed`], discarding
    /// intermediate records.
    pub fn run_to_completion(&mut self) -> Digest {
        loop {
            match self.advance() {
                StepOutcome::Completed(digest) => return digest,
                StepOutcome::AlreadyCompleted => {
                    // Completed sessions keep their final state; recompute the
                    // digest from it.
                    return Digest::from_state(self.state);
                }
                StepOutcome::Step(_) | StepOutcome::BlockBoundary { .. } => {}
            }
        }
    }
}
