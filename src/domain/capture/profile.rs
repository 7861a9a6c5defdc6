//! Constraint profiles requested from the capture device.
//!
//! A `ProfileChain` is tried in order of decreasing strictness: the first
//! profile hard-requires the facing mode, the fallback only prefers it and
//! drops the resolution and frame-rate hints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Which way the camera faces relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear camera, pointed away from the user. Preferred for scanning.
    #[default]
    Environment,
    /// Front camera.
    User,
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

/// Whether a constraint must be met or is only a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Exact,
    Ideal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacingConstraint {
    pub mode: FacingMode,
    pub requirement: Requirement,
}

/// Preferred frame size. Always a hint, never a hard requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionHint {
    pub width: u32,
    pub height: u32,
}

impl ResolutionHint {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Desired device parameters for one acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintProfile {
    name: String,
    facing: FacingConstraint,
    resolution: Option<ResolutionHint>,
    frame_rate: Option<u32>,
}

impl ConstraintProfile {
    pub fn new(
        name: impl Into<String>,
        facing: FacingConstraint,
        resolution: Option<ResolutionHint>,
        frame_rate: Option<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            facing,
            resolution,
            frame_rate,
        }
    }

    /// Hard-requires `mode` and asks for the given size and rate.
    pub fn strict(mode: FacingMode, resolution: ResolutionHint, frame_rate: u32) -> Self {
        Self::new(
            "strict",
            FacingConstraint {
                mode,
                requirement: Requirement::Exact,
            },
            Some(resolution),
            Some(frame_rate),
        )
    }

    /// Prefers `mode` and leaves size and rate to the device.
    pub fn relaxed(mode: FacingMode) -> Self {
        Self::new(
            "relaxed",
            FacingConstraint {
                mode,
                requirement: Requirement::Ideal,
            },
            None,
            None,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facing(&self) -> FacingConstraint {
        self.facing
    }

    pub fn resolution(&self) -> Option<ResolutionHint> {
        self.resolution
    }

    pub fn frame_rate(&self) -> Option<u32> {
        self.frame_rate
    }

    /// Returns true if the device may refuse this profile on facing alone.
    pub fn is_hard_constrained(&self) -> bool {
        self.facing.requirement == Requirement::Exact
    }
}

/// Ordered, non-empty list of profiles, strictest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChain(Vec<ConstraintProfile>);

impl ProfileChain {
    pub fn new(profiles: Vec<ConstraintProfile>) -> Result<Self, ValidationError> {
        if profiles.is_empty() {
            return Err(ValidationError::empty_field("profiles"));
        }
        Ok(Self(profiles))
    }

    /// Strict profile followed by its relaxed fallback.
    pub fn standard(mode: FacingMode, resolution: ResolutionHint, frame_rate: u32) -> Self {
        Self(vec![
            ConstraintProfile::strict(mode, resolution, frame_rate),
            ConstraintProfile::relaxed(mode),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstraintProfile> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProfileChain {
    fn default() -> Self {
        Self::standard(FacingMode::Environment, ResolutionHint::new(1280, 720), 30)
    }
}
