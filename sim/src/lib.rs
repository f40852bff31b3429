#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation controller that drives the raster life automaton.
//!
//! The controller exclusively owns the simulation state: the immutable start
//! grid kept for resets, the live current grid, and the cycle counter. Each
//! reporting interval it lets the lifecycle system produce successor grids,
//! externalizes the result through the injected [`RasterStore`], and
//! notifies the optional [`FrameSink`]. There is exactly one logical writer
//! and no concurrency; a step completes fully before the next begins.

use std::{
    thread,
    time::{Duration, Instant},
};

use raster_life_core::{
    cycle_snapshot_name, CleanupWarning, FrameSink, NullSink, RasterStore, StoreError,
    START_SNAPSHOT,
};
use raster_life_grid::Grid;
use raster_life_system_lifecycle::step;

/// Pacing delay applied after each externalized interval by default.
pub const DEFAULT_PACING: Duration = Duration::from_millis(650);

/// Configuration accepted by the simulation controller.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Reuse one snapshot slot per step instead of numbering each cycle.
    pub overwrite: bool,
    /// Cosmetic delay after an interval is externalized and announced.
    ///
    /// Purely pacing for an external viewer; zero skips the sleep entirely,
    /// which is what automated runs and tests use.
    pub pacing: Duration,
    /// Style hint forwarded verbatim to the frame sink.
    pub style_hint: String,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            pacing: DEFAULT_PACING,
            style_hint: String::from("classic"),
        }
    }
}

impl SimOptions {
    /// Options suited to automated execution: no pacing, overwrite retained.
    #[must_use]
    pub fn unpaced() -> Self {
        Self {
            pacing: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Timing summary returned by [`Simulation::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    raw_cycles: u64,
    average_step: Duration,
}

impl RunReport {
    /// Number of raw simulation cycles the run executed.
    #[must_use]
    pub const fn raw_cycles(&self) -> u64 {
        self.raw_cycles
    }

    /// Mean duration of one lifecycle step, store I/O excluded.
    #[must_use]
    pub const fn average_step(&self) -> Duration {
        self.average_step
    }
}

/// Owns the simulation state and drives the automaton through its store.
#[derive(Debug)]
pub struct Simulation<S: RasterStore, F: FrameSink> {
    start: Grid,
    current: Grid,
    cycle_count: u64,
    externalized: Vec<String>,
    store: S,
    sink: Option<F>,
    options: SimOptions,
}

impl<S: RasterStore> Simulation<S, NullSink> {
    /// Creates a controller without a display collaborator.
    pub fn headless(start: Grid, store: S, options: SimOptions) -> Result<Self, StoreError> {
        Self::new(start, store, None, options)
    }
}

impl<S: RasterStore, F: FrameSink> Simulation<S, F> {
    /// Creates a controller, externalizing the start grid under `"start"`.
    ///
    /// A store failure aborts construction; the controller never begins with
    /// a start state that has no durable representation.
    pub fn new(
        start: Grid,
        mut store: S,
        mut sink: Option<F>,
        options: SimOptions,
    ) -> Result<Self, StoreError> {
        start.to_raster(&mut store, START_SNAPSHOT)?;
        if let Some(sink) = sink.as_mut() {
            sink.frame_ready(START_SNAPSHOT, &options.style_hint);
        }
        Ok(Self {
            current: start.clone(),
            start,
            cycle_count: 0,
            externalized: Vec::new(),
            store,
            sink,
            options,
        })
    }

    /// Executes `steps * report_interval` raw cycles.
    ///
    /// The cycle counter advances by `report_interval` each time that many
    /// raw cycles complete, and only those boundaries externalize a snapshot
    /// and notify the sink; intermediate generations stay in memory to bound
    /// I/O volume. A snapshot write failure aborts the run because later
    /// steps depend on externalized state. `report_interval` is clamped to a
    /// minimum of one.
    pub fn run(&mut self, steps: u64, report_interval: u64) -> Result<RunReport, StoreError> {
        let interval = report_interval.max(1);
        let mut elapsed = Duration::ZERO;
        let mut raw_cycles: u64 = 0;

        for _ in 0..steps {
            for _ in 0..interval {
                let started = Instant::now();
                self.current = step(&self.current);
                elapsed += started.elapsed();
                raw_cycles += 1;
            }

            self.cycle_count = self.cycle_count.saturating_add(interval);
            let identifier = cycle_snapshot_name(self.options.overwrite, self.cycle_count);
            self.current.to_raster(&mut self.store, &identifier)?;
            if !self.externalized.contains(&identifier) {
                self.externalized.push(identifier.clone());
            }
            if let Some(sink) = self.sink.as_mut() {
                sink.frame_ready(&identifier, &self.options.style_hint);
            }
            if !self.options.pacing.is_zero() {
                thread::sleep(self.options.pacing);
            }
        }

        let average_step = if raw_cycles == 0 {
            Duration::ZERO
        } else {
            elapsed / u32::try_from(raw_cycles).unwrap_or(u32::MAX)
        };
        Ok(RunReport {
            raw_cycles,
            average_step,
        })
    }

    /// Returns the simulation to its start state.
    ///
    /// The current grid becomes a fresh copy of the start grid, the cycle
    /// counter returns to zero, and every externalized cycle snapshot is
    /// deleted; the start snapshot is always retained. Failed deletions are
    /// collected as warnings rather than aborting, because losing an old
    /// snapshot must never block returning to a valid start state.
    pub fn reset(&mut self) -> Vec<CleanupWarning> {
        self.current = self.start.clone();
        self.cycle_count = 0;

        let mut warnings = Vec::new();
        for identifier in self.externalized.drain(..) {
            if let Err(error) = self.store.delete(&identifier) {
                warnings.push(CleanupWarning {
                    reason: error.to_string(),
                    identifier,
                });
            }
        }
        warnings
    }

    /// Read-only access to the live grid.
    #[must_use]
    pub const fn current(&self) -> &Grid {
        &self.current
    }

    /// Read-only access to the immutable start grid.
    #[must_use]
    pub const fn start(&self) -> &Grid {
        &self.start
    }

    /// Number of cycles accumulated across completed reporting intervals.
    #[must_use]
    pub const fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Read-only access to the injected raster store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the controller, yielding the store and sink collaborators.
    #[must_use]
    pub fn into_parts(self) -> (S, Option<F>) {
        (self.store, self.sink)
    }
}
