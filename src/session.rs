use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
#[cfg(any(feature = "use_serde", feature = "python_bindings"))]
use serde::{Deserialize, Serialize};
use tinymt::{TinyMT64, TinyMT64Seed};

use crate::{
    compute_sums, insert_point, refine_equidistant, DarbouxError, Function, Result, SumDetails,
};

/// Partitions larger than this are clamped.
pub const MAX_POINTS_CEILING: usize = 1000;
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(500);
/// Delays between two refinement steps that a front end should offer.
pub const STEP_DELAY_RANGE: (Duration, Duration) =
    (Duration::from_millis(50), Duration::from_millis(2000));

/// Clamp a requested delay between two steps into [`STEP_DELAY_RANGE`].
pub fn clamp_step_delay(delay: Duration) -> Duration {
    delay.max(STEP_DELAY_RANGE.0).min(STEP_DELAY_RANGE.1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(feature = "use_serde", feature = "python_bindings"),
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PartitionMode {
    /// Split the widest subinterval at a random point and update the sums incrementally.
    Random,
    /// Rebuild an equidistant partition with one more point and recompute the sums.
    Equidistant,
}

impl Default for PartitionMode {
    fn default() -> PartitionMode {
        PartitionMode::Random
    }
}

impl FromStr for PartitionMode {
    type Err = DarbouxError;

    fn from_str(s: &str) -> Result<PartitionMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(PartitionMode::Random),
            "equidistant" => Ok(PartitionMode::Equidistant),
            _ => Err(DarbouxError::UnknownMode(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(feature = "use_serde", feature = "python_bindings"),
    derive(Serialize, Deserialize),
    serde(default)
)]
pub struct Config {
    pub a: f64,
    pub b: f64,
    pub max_points: usize,
    pub function: Function,
    pub mode: PartitionMode,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            a: 0.,
            b: 1.,
            max_points: 15,
            function: Function::Square,
            mode: PartitionMode::Random,
        }
    }
}

impl Config {
    /// Check the bounds and the number of points, clamping the latter to
    /// [`MAX_POINTS_CEILING`].
    pub fn validate(mut self) -> Result<Config> {
        if !self.a.is_finite() || !self.b.is_finite() || self.a >= self.b {
            return Err(DarbouxError::InvalidBounds {
                a: self.a,
                b: self.b,
            });
        }

        if self.max_points < 2 {
            return Err(DarbouxError::TooFewPoints(self.max_points));
        }

        if self.max_points > MAX_POINTS_CEILING {
            warn!(
                "Maximum number of points {} clamped to {}",
                self.max_points, MAX_POINTS_CEILING
            );
            self.max_points = MAX_POINTS_CEILING;
        }

        Ok(self)
    }
}

/// The numbers a front end shows after every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub points: usize,
    pub lower_sum: f64,
    pub upper_sum: f64,
    pub difference: f64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Points: {}", self.points)?;
        writeln!(f, "Lower Sum: {:.6}", self.lower_sum)?;
        writeln!(f, "Upper Sum: {:.6}", self.upper_sum)?;
        write!(f, "Difference: {:.6}", self.difference)
    }
}

/// The state of a refinement run that can be resumed later.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(feature = "use_serde", feature = "python_bindings"),
    derive(Serialize, Deserialize)
)]
pub struct Snapshot {
    pub config: Config,
    pub points: Vec<f64>,
    pub details: SumDetails,
}

/// Drives the refinement of a partition from `[a, b]` up to `max_points` points.
pub struct Session {
    config: Config,
    points: Vec<f64>,
    details: SumDetails,
    rng: TinyMT64,
    warned_non_finite: bool,
}

impl Session {
    pub fn new(config: Config, seed: Option<u64>) -> Result<Session> {
        let config = config.validate()?;
        let (points, details) = compute_sums(vec![config.a, config.b], &config.function);

        info!(
            "Starting {:?} refinement of {} on [{}, {}] up to {} points",
            config.mode,
            config.function,
            config.a,
            config.b,
            config.max_points
        );

        let mut session = Session {
            config,
            points,
            details,
            rng: new_rng(seed),
            warned_non_finite: false,
        };
        session.check_finite();
        Ok(session)
    }

    /// Resume from a snapshot. The snapshot's details are trusted to belong to its points.
    pub fn from_snapshot(snapshot: Snapshot, seed: Option<u64>) -> Result<Session> {
        let config = snapshot.config.validate()?;

        if snapshot.points.len() < 2 {
            return Err(DarbouxError::PartitionTooShort(snapshot.points.len()));
        }
        if snapshot.details.max_subinterval_index >= snapshot.points.len() - 1 {
            return Err(DarbouxError::SubintervalOutOfRange {
                index: snapshot.details.max_subinterval_index,
                subintervals: snapshot.points.len() - 1,
            });
        }

        let mut session = Session {
            config,
            points: snapshot.points,
            details: snapshot.details,
            rng: new_rng(seed),
            warned_non_finite: false,
        };
        session.check_finite();
        Ok(session)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config.clone(),
            points: self.points.clone(),
            details: self.details,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn details(&self) -> &SumDetails {
        &self.details
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.config.max_points
    }

    pub fn report(&self) -> Report {
        Report {
            points: self.points.len(),
            lower_sum: self.details.lower_sum,
            upper_sum: self.details.upper_sum,
            difference: self.details.difference(),
        }
    }

    /// Add one point to the partition. Returns `false` when the run was already complete.
    pub fn step(&mut self) -> Result<bool> {
        if self.is_complete() {
            return Ok(false);
        }

        let f = &self.config.function;
        let (points, details) = match self.config.mode {
            PartitionMode::Random => {
                insert_point(self.points.clone(), f, &self.details, &mut self.rng)?
            }
            PartitionMode::Equidistant => compute_sums(refine_equidistant(&self.points), f),
        };
        self.points = points;
        self.details = details;

        debug!(
            "Step to {} points: lower={}, upper={}, widest={}",
            self.points.len(),
            self.details.lower_sum,
            self.details.upper_sum,
            self.details.max_subinterval_index
        );

        self.check_finite();
        if self.is_complete() {
            info!(
                "Refinement complete at {} points: difference={}",
                self.points.len(),
                self.details.difference()
            );
        }

        Ok(true)
    }

    /// Step until the partition has `max_points` points. Returns the number of steps taken.
    pub fn run(&mut self) -> Result<usize> {
        let mut steps = 0;
        while self.step()? {
            steps += 1;
        }
        Ok(steps)
    }

    fn check_finite(&mut self) {
        if !self.warned_non_finite && !self.details.is_finite() {
            warn!(
                "Sums of {} on [{}, {}] are not finite: lower={}, upper={}",
                self.config.function,
                self.config.a,
                self.config.b,
                self.details.lower_sum,
                self.details.upper_sum
            );
            self.warned_non_finite = true;
        }
    }
}

pub(crate) fn new_rng(seed: Option<u64>) -> TinyMT64 {
    if let Some(seed) = seed {
        TinyMT64::from_seed(TinyMT64Seed::from(seed))
    } else {
        TinyMT64::from_entropy()
    }
}
