//! Restart schedules for the CDCL backend.
//!
//! A restart abandons the current partial assignment and resumes search from the
//! root, keeping learnt clauses, activities and saved phases. Schedules count
//! conflicts:
//!   - `Luby`: intervals follow the Luby sequence 1, 1, 2, 1, 1, 2, 4, ... scaled by `N`.
//!   - `Geometric`: each interval is `N` times the previous one.
//!   - `Linear`: each interval is `N` longer than the previous one.
//!   - `Never`: no restarts.

use clap::ValueEnum;
use std::fmt::Debug;

/// A conflict-counting restart schedule.
pub trait Restarter: Debug + Clone {
    /// A schedule at the start of its first interval.
    fn new() -> Self;

    /// Conflicts left until the next restart.
    fn restarts_in(&self) -> usize;

    /// Counts one conflict against the current interval.
    fn increment_restarts_in(&mut self);

    /// Starts the next interval.
    fn restart(&mut self);

    /// Restarts performed so far.
    fn num_restarts(&self) -> usize;

    /// Called once per conflict. Returns `true` when the interval has run out, in
    /// which case the next interval has already been started.
    fn should_restart(&mut self) -> bool {
        if self.restarts_in() == 0 {
            self.restart();
            true
        } else {
            self.increment_restarts_in();
            false
        }
    }
}

/// Luby-sequence intervals scaled by `N` conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Luby<const N: usize> {
    restarts: usize,
    restarts_in: usize,
    restarts_next: usize,
}

impl<const N: usize> Luby<N> {
    /// The `x`-th element (1-based) of the Luby sequence.
    #[must_use]
    pub fn luby(x: usize) -> usize {
        let mut k = 1_usize;
        while (1 << k) - 1 < x {
            k += 1;
        }
        if x == (1 << k) - 1 {
            1 << (k - 1)
        } else {
            Self::luby(x - (1 << (k - 1)) + 1)
        }
    }
}

impl<const N: usize> Restarter for Luby<N> {
    fn new() -> Self {
        Self {
            restarts: 0,
            restarts_in: N,
            restarts_next: 2,
        }
    }

    fn restarts_in(&self) -> usize {
        self.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.restarts_in = self.restarts_in.saturating_sub(1);
    }

    fn restart(&mut self) {
        self.restarts += 1;
        self.restarts_in = Self::luby(self.restarts_next) * N;
        self.restarts_next += 1;
    }

    fn num_restarts(&self) -> usize {
        self.restarts
    }
}

/// Intervals growing by a factor of `N`, starting at 100 conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometric<const N: usize> {
    restarts: usize,
    restarts_in: usize,
    restarts_interval: usize,
}

const GEOMETRIC_FIRST_INTERVAL: usize = 100;

impl<const N: usize> Restarter for Geometric<N> {
    fn new() -> Self {
        Self {
            restarts: 0,
            restarts_in: GEOMETRIC_FIRST_INTERVAL,
            restarts_interval: GEOMETRIC_FIRST_INTERVAL,
        }
    }

    fn restarts_in(&self) -> usize {
        self.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.restarts_in = self.restarts_in.saturating_sub(1);
    }

    fn restart(&mut self) {
        self.restarts += 1;
        self.restarts_interval = self.restarts_interval.saturating_mul(N);
        self.restarts_in = self.restarts_interval;
    }

    fn num_restarts(&self) -> usize {
        self.restarts
    }
}

/// Intervals growing by `N` conflicts each time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linear<const N: usize> {
    restarts: usize,
    restarts_in: usize,
    restarts_interval: usize,
}

impl<const N: usize> Restarter for Linear<N> {
    fn new() -> Self {
        Self {
            restarts: 0,
            restarts_in: N,
            restarts_interval: N,
        }
    }

    fn restarts_in(&self) -> usize {
        self.restarts_in
    }

    fn increment_restarts_in(&mut self) {
        self.restarts_in = self.restarts_in.saturating_sub(1);
    }

    fn restart(&mut self) {
        self.restarts += 1;
        self.restarts_interval = self.restarts_interval.saturating_add(N);
        self.restarts_in = self.restarts_interval;
    }

    fn num_restarts(&self) -> usize {
        self.restarts
    }
}

/// Never restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Never;

impl Restarter for Never {
    fn new() -> Self {
        Self
    }

    fn restarts_in(&self) -> usize {
        usize::MAX
    }

    fn increment_restarts_in(&mut self) {}

    fn restart(&mut self) {}

    fn num_restarts(&self) -> usize {
        0
    }

    fn should_restart(&mut self) -> bool {
        false
    }
}

/// Run-time choice between the schedules above.
#[derive(Debug, Clone)]
pub enum RestarterImpls {
    /// Luby intervals in units of 100 conflicts.
    Luby(Luby<100>),
    /// Doubling intervals.
    Geometric(Geometric<2>),
    /// Intervals growing by 100 conflicts.
    Linear(Linear<100>),
    /// No restarts.
    Never(Never),
}

impl Restarter for RestarterImpls {
    fn new() -> Self {
        Self::Luby(Luby::new())
    }

    fn restarts_in(&self) -> usize {
        match self {
            Self::Luby(r) => r.restarts_in(),
            Self::Geometric(r) => r.restarts_in(),
            Self::Linear(r) => r.restarts_in(),
            Self::Never(r) => r.restarts_in(),
        }
    }

    fn increment_restarts_in(&mut self) {
        match self {
            Self::Luby(r) => r.increment_restarts_in(),
            Self::Geometric(r) => r.increment_restarts_in(),
            Self::Linear(r) => r.increment_restarts_in(),
            Self::Never(r) => r.increment_restarts_in(),
        }
    }

    fn restart(&mut self) {
        match self {
            Self::Luby(r) => r.restart(),
            Self::Geometric(r) => r.restart(),
            Self::Linear(r) => r.restart(),
            Self::Never(r) => r.restart(),
        }
    }

    fn num_restarts(&self) -> usize {
        match self {
            Self::Luby(r) => r.num_restarts(),
            Self::Geometric(r) => r.num_restarts(),
            Self::Linear(r) => r.num_restarts(),
            Self::Never(r) => r.num_restarts(),
        }
    }

    fn should_restart(&mut self) -> bool {
        match self {
            Self::Luby(r) => r.should_restart(),
            Self::Geometric(r) => r.should_restart(),
            Self::Linear(r) => r.should_restart(),
            Self::Never(r) => r.should_restart(),
        }
    }
}

/// Names of the restart schedules, as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum RestarterType {
    /// Luby sequence.
    #[default]
    Luby,
    /// Geometrically growing intervals.
    Geometric,
    /// Linearly growing intervals.
    Linear,
    /// No restarts.
    Never,
}

impl RestarterType {
    /// The schedule named by `self`.
    #[must_use]
    pub fn to_impl(self) -> RestarterImpls {
        match self {
            Self::Luby => RestarterImpls::Luby(Luby::new()),
            Self::Geometric => RestarterImpls::Geometric(Geometric::new()),
            Self::Linear => RestarterImpls::Linear(Linear::new()),
            Self::Never => RestarterImpls::Never(Never),
        }
    }
}
