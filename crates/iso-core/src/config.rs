//! Tunables for planarization, dual construction and lazy routing.
//!
//! One `IsoConfig` value is built by the application and passed by reference
//! into every constructor that needs it.  Nothing in the workspace reads a
//! global flag.

use crate::{IsoError, IsoResult};

// ── IsoConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// Typically deserialized from the application's own config file (enable the
/// `serde` feature) and validated once with [`IsoConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IsoConfig {
    /// Emit stage summaries at `info` level instead of `debug`.
    pub verbose: bool,

    /// Global factor applied to the length of the arc entering the target
    /// anchor.  Default: 1.0.
    pub dilation: f64,

    /// Extra factor on the final arc when its bearing is not octilinear.
    /// Default: 1.0 (no malus).
    pub non_octilinear_malus: f64,

    /// Maximum distance between a crossing node and an original arc for the
    /// arc to count as covering it.  Default: 2e-3.
    pub cover_epsilon: f64,

    /// Split points closer than this to an existing vertex are merged into it
    /// during noding.  Default: 1e-9.
    pub snap_tolerance: f64,

    /// Angular tolerance (degrees) under which a candidate direction counts as
    /// collinear with an overlay reference.  Default: 1e-9.
    pub direction_epsilon: f64,

    /// Angular tolerance (degrees) for the octilinear test.  Default: 1e-6.
    pub octilinear_tolerance_deg: f64,

    /// Offset between successive dual-node placement attempts.  Default: 1e-6.
    pub perturb_step: f64,

    /// Placement attempts after the first before dual construction fails.
    /// Default: 64.
    pub max_perturbations: u32,
}

impl Default for IsoConfig {
    fn default() -> Self {
        Self {
            verbose:                  false,
            dilation:                 1.0,
            non_octilinear_malus:     1.0,
            cover_epsilon:            2e-3,
            snap_tolerance:           1e-9,
            direction_epsilon:        1e-9,
            octilinear_tolerance_deg: 1e-6,
            perturb_step:             1e-6,
            max_perturbations:        64,
        }
    }
}

impl IsoConfig {
    /// Check every numeric field for finiteness and sign.
    pub fn validate(&self) -> IsoResult<()> {
        positive("dilation", self.dilation)?;
        positive("non_octilinear_malus", self.non_octilinear_malus)?;
        positive("cover_epsilon", self.cover_epsilon)?;
        non_negative("snap_tolerance", self.snap_tolerance)?;
        non_negative("direction_epsilon", self.direction_epsilon)?;
        non_negative("octilinear_tolerance_deg", self.octilinear_tolerance_deg)?;
        positive("perturb_step", self.perturb_step)?;
        Ok(())
    }

    /// Builder-style override of [`dilation`](Self::dilation).
    pub fn with_dilation(mut self, dilation: f64) -> Self {
        self.dilation = dilation;
        self
    }

    /// Builder-style override of [`non_octilinear_malus`](Self::non_octilinear_malus).
    pub fn with_malus(mut self, malus: f64) -> Self {
        self.non_octilinear_malus = malus;
        self
    }

    /// Level used for stage summaries: `Info` when verbose, `Debug` otherwise.
    pub fn log_level(&self) -> log::Level {
        if self.verbose { log::Level::Info } else { log::Level::Debug }
    }

    /// Builder-style override of [`verbose`](Self::verbose).
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

fn positive(field: &'static str, value: f64) -> IsoResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(IsoError::Config { field, value, reason: "must be finite and > 0" })
    }
}

fn non_negative(field: &'static str, value: f64) -> IsoResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IsoError::Config { field, value, reason: "must be finite and >= 0" })
    }
}
