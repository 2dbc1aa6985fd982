// Copyright 2025 the ember authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pluggable task-scheduler backends for the constraint solver.
//!
//! The solver's internal parallelism fans out on a rayon thread pool. Which
//! pool is selected at startup from launch flags (`-s`, `-mpt`, `-tbb`); the
//! default parallel backend is always available as a fallback and the active
//! backend can be cycled at runtime without reinitializing the world.

use std::thread;

/// The closed set of scheduler backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// Single worker thread; deterministic, useful for debugging.
    Sequential,
    /// One worker per available core.
    MultiProcessing,
    /// Work-stealing pool sized to the available cores.
    ThreadBuildingBlocks,
    /// The process-wide default rayon pool.
    DefaultParallel,
}

impl SchedulerKind {
    /// Human-readable backend name, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SchedulerKind::Sequential => "sequential",
            SchedulerKind::MultiProcessing => "multi-processing",
            SchedulerKind::ThreadBuildingBlocks => "tbb",
            SchedulerKind::DefaultParallel => "default-parallel",
        }
    }

    /// The launch flag that selects this backend, if any.
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-s" => Some(SchedulerKind::Sequential),
            "-mpt" => Some(SchedulerKind::MultiProcessing),
            "-tbb" => Some(SchedulerKind::ThreadBuildingBlocks),
            _ => None,
        }
    }

    fn thread_count(&self) -> Option<usize> {
        let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        match self {
            SchedulerKind::Sequential => Some(1),
            SchedulerKind::MultiProcessing => Some(cores),
            SchedulerKind::ThreadBuildingBlocks => Some(cores),
            // None means "use the global rayon pool".
            SchedulerKind::DefaultParallel => None,
        }
    }
}

struct Backend {
    kind: SchedulerKind,
    pool: Option<rayon::ThreadPool>,
}

impl Backend {
    fn build(kind: SchedulerKind) -> Self {
        let pool = kind.thread_count().and_then(|threads| {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    log::warn!(
                        "Could not build '{}' scheduler pool ({e}); falling back to the global pool.",
                        kind.label()
                    );
                    None
                }
            }
        });
        Self { kind, pool }
    }
}

/// The pool of interchangeable scheduler backends resolved at startup.
///
/// Exactly one backend is active at a time; [`SchedulerPool::cycle`] advances
/// to the next one in the pool.
pub struct SchedulerPool {
    backends: Vec<Backend>,
    active: usize,
}

impl SchedulerPool {
    /// Resolves the backend pool from launch arguments.
    ///
    /// Recognized flags: `-s` (sequential), `-mpt` (multi-processing), `-tbb`
    /// (TBB-style work stealing). Unrecognized arguments are ignored. The
    /// default parallel backend is always appended, so the pool is never
    /// empty and absence of every flag falls back to it.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut kinds: Vec<SchedulerKind> = Vec::new();
        for arg in args {
            if let Some(kind) = SchedulerKind::from_flag(arg.as_ref()) {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds.push(SchedulerKind::DefaultParallel);
        Self::from_kinds(kinds)
    }

    /// Builds a pool from an explicit list of backends. The list must not be
    /// empty; the first entry becomes the active backend.
    pub fn from_kinds(kinds: Vec<SchedulerKind>) -> Self {
        assert!(!kinds.is_empty(), "scheduler pool cannot be empty");
        let backends = kinds.into_iter().map(Backend::build).collect();
        let pool = Self {
            backends,
            active: 0,
        };
        log::info!("Task scheduler: {}", pool.active().label());
        pool
    }

    /// Returns the kind of the active backend.
    pub fn active(&self) -> SchedulerKind {
        self.backends[self.active].kind
    }

    /// Switches to the next backend in the pool, wrapping around.
    pub fn cycle(&mut self) -> SchedulerKind {
        self.active = (self.active + 1) % self.backends.len();
        let kind = self.active();
        log::info!("Task scheduler switched to {}", kind.label());
        kind
    }

    /// Runs `op` inside the active backend's thread pool so that any internal
    /// rayon parallelism fans out on it. Returns once `op` completes.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.backends[self.active].pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl Default for SchedulerPool {
    fn default() -> Self {
        Self::from_kinds(vec![SchedulerKind::DefaultParallel])
    }
}

impl std::fmt::Debug for SchedulerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerPool")
            .field("active", &self.active().label())
            .field("backends", &self.backends.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_falls_back_to_default_parallel() {
        let pool = SchedulerPool::from_args(["game", "--fullscreen"]);
        assert_eq!(pool.active(), SchedulerKind::DefaultParallel);
    }

    #[test]
    fn flags_select_backends_in_order() {
        let pool = SchedulerPool::from_args(["-tbb", "-s"]);
        assert_eq!(pool.active(), SchedulerKind::ThreadBuildingBlocks);
    }

    #[test]
    fn duplicate_flags_are_collapsed() {
        let mut pool = SchedulerPool::from_args(["-s", "-s"]);
        assert_eq!(pool.active(), SchedulerKind::Sequential);
        // Pool is {sequential, default-parallel}: two cycles wrap around.
        assert_eq!(pool.cycle(), SchedulerKind::DefaultParallel);
        assert_eq!(pool.cycle(), SchedulerKind::Sequential);
    }

    #[test]
    fn cycle_visits_every_backend() {
        let mut pool = SchedulerPool::from_args(["-s", "-mpt", "-tbb"]);
        let mut seen = vec![pool.active()];
        for _ in 0..3 {
            seen.push(pool.cycle());
        }
        assert_eq!(
            seen,
            vec![
                SchedulerKind::Sequential,
                SchedulerKind::MultiProcessing,
                SchedulerKind::ThreadBuildingBlocks,
                SchedulerKind::DefaultParallel,
            ]
        );
    }

    #[test]
    fn install_runs_the_closure_to_completion() {
        let pool = SchedulerPool::from_kinds(vec![SchedulerKind::Sequential]);
        let sum: i64 = pool.install(|| (0..1000).sum());
        assert_eq!(sum, 499_500);
    }
}
