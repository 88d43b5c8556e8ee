//! Controller registry: stable names to fresh instances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::adaptive::ArcAdaptive;
use crate::baseline::{NaiveCalm, NoControl, PerfOptimized};
use crate::controller::Controller;
use crate::error::ControlError;
use crate::hierarchical::ArcV2;
use crate::lqr::{ArcLqi, ArcLqr};
use crate::meta::ArcV3;
use crate::pid::ArcPid;
use crate::proportional::{Ablation, ArcV1};
use crate::robust::ArcRobust;
use crate::ultimate::ArcUltimate;

/// Every registered controller, addressed by its stable short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    /// No regulation.
    NoControl,
    /// Arousal damping only.
    NaiveCalm,
    /// High attention, no regulation.
    PerfOptimized,
    /// Proportional ARC.
    ArcV1,
    /// Proportional ARC without narrative suppression.
    ArcNoDmg,
    /// Proportional ARC without arousal damping.
    ArcNoCalm,
    /// Proportional ARC without memory gating.
    ArcNoMem,
    /// Proportional ARC without reappraisal.
    ArcNoReapp,
    /// Three-channel PID.
    ArcV1Pid,
    /// Fixed-gain LQR.
    ArcV1Lqr,
    /// LQR with narrative and arousal integrals.
    ArcV1Lqi,
    /// Multi-rate hierarchical.
    ArcV2Hier,
    /// Multi-rate hierarchical with the LQI law.
    ArcV2Lqi,
    /// Proportional under a meta loop.
    ArcV3Meta,
    /// PID under a meta loop.
    ArcV3PidMeta,
    /// LQR under a meta loop.
    ArcV3LqrMeta,
    /// Conservative gains with a disturbance margin.
    ArcRobust,
    /// Self-tuning gains.
    ArcAdaptive,
    /// LQI blended with the predictive correction.
    ArcUltimate,
}

impl ControllerKind {
    /// Every registered controller.
    pub const ALL: [Self; 19] = [
        Self::NoControl,
        Self::NaiveCalm,
        Self::PerfOptimized,
        Self::ArcV1,
        Self::ArcNoDmg,
        Self::ArcNoCalm,
        Self::ArcNoMem,
        Self::ArcNoReapp,
        Self::ArcV1Pid,
        Self::ArcV1Lqr,
        Self::ArcV1Lqi,
        Self::ArcV2Hier,
        Self::ArcV2Lqi,
        Self::ArcV3Meta,
        Self::ArcV3PidMeta,
        Self::ArcV3LqrMeta,
        Self::ArcRobust,
        Self::ArcAdaptive,
        Self::ArcUltimate,
    ];

    /// The controllers compared in a standard experiment (no ablations).
    pub const COMPARISON: [Self; 15] = [
        Self::NoControl,
        Self::NaiveCalm,
        Self::PerfOptimized,
        Self::ArcV1,
        Self::ArcV1Pid,
        Self::ArcV1Lqr,
        Self::ArcV1Lqi,
        Self::ArcV2Hier,
        Self::ArcV2Lqi,
        Self::ArcV3Meta,
        Self::ArcV3PidMeta,
        Self::ArcV3LqrMeta,
        Self::ArcRobust,
        Self::ArcAdaptive,
        Self::ArcUltimate,
    ];

    /// The ablation study: full v1 and each single-channel removal.
    pub const ABLATION: [Self; 5] = [
        Self::ArcV1,
        Self::ArcNoDmg,
        Self::ArcNoCalm,
        Self::ArcNoMem,
        Self::ArcNoReapp,
    ];

    /// Stable short name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoControl => "no_control",
            Self::NaiveCalm => "naive_calm",
            Self::PerfOptimized => "perf_optimized",
            Self::ArcV1 => "arc_v1",
            Self::ArcNoDmg => "arc_no_dmg",
            Self::ArcNoCalm => "arc_no_calm",
            Self::ArcNoMem => "arc_no_mem",
            Self::ArcNoReapp => "arc_no_reapp",
            Self::ArcV1Pid => "arc_v1_pid",
            Self::ArcV1Lqr => "arc_v1_lqr",
            Self::ArcV1Lqi => "arc_v1_lqi",
            Self::ArcV2Hier => "arc_v2_hier",
            Self::ArcV2Lqi => "arc_v2_lqi",
            Self::ArcV3Meta => "arc_v3_meta",
            Self::ArcV3PidMeta => "arc_v3_pid_meta",
            Self::ArcV3LqrMeta => "arc_v3_lqr_meta",
            Self::ArcRobust => "arc_robust",
            Self::ArcAdaptive => "arc_adaptive",
            Self::ArcUltimate => "arc_ultimate",
        }
    }

    /// Build a fresh instance with zeroed run-local state.
    pub fn build(self) -> Box<dyn Controller> {
        match self {
            Self::NoControl => Box::new(NoControl),
            Self::NaiveCalm => Box::new(NaiveCalm),
            Self::PerfOptimized => Box::new(PerfOptimized),
            Self::ArcV1 => Box::new(ArcV1::new()),
            Self::ArcNoDmg => Box::new(ArcV1::ablated(Ablation::NoDmg)),
            Self::ArcNoCalm => Box::new(ArcV1::ablated(Ablation::NoCalm)),
            Self::ArcNoMem => Box::new(ArcV1::ablated(Ablation::NoMem)),
            Self::ArcNoReapp => Box::new(ArcV1::ablated(Ablation::NoReapp)),
            Self::ArcV1Pid => Box::new(ArcPid::new()),
            Self::ArcV1Lqr => Box::new(ArcLqr::new()),
            Self::ArcV1Lqi => Box::new(ArcLqi::new()),
            Self::ArcV2Hier => Box::new(ArcV2::new()),
            Self::ArcV2Lqi => Box::new(ArcV2::with_lqi()),
            Self::ArcV3Meta => Box::new(ArcV3::new()),
            Self::ArcV3PidMeta => Box::new(ArcPid::with_meta()),
            Self::ArcV3LqrMeta => Box::new(ArcLqr::with_meta()),
            Self::ArcRobust => Box::new(ArcRobust::new()),
            Self::ArcAdaptive => Box::new(ArcAdaptive::new()),
            Self::ArcUltimate => Box::new(ArcUltimate::new()),
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerKind {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ControlError::UnknownController { name: s.to_owned() })
    }
}
