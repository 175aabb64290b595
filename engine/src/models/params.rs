//! Tunable parameters and named presets
//!
//! Three scalars drive every transition in the timeline. They can be
//! mutated at any moment by the input surface; transitions only ever read
//! them. Presets bundle all three into a named treasury "personality" and
//! are applied atomically together with a full reset.

use serde::{Deserialize, Serialize};

/// The three user-tunable scalars, all expressed in percent.
///
/// Conventional ranges: shock 0-50, target reserve ratio 100-150, yield
/// distribution 0-100. Values outside these ranges are not rejected; the
/// transitions are total functions and the view constrains its sliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    /// Percentage haircut applied to bond holdings at the shock step.
    pub shock_magnitude: f64,

    /// Reserve-ratio threshold below which the rebalance step triggers.
    pub target_reserve_ratio: f64,

    /// Percentage of total portfolio value paid out at the distribution step.
    pub yield_distribution: f64,
}

impl ParameterSet {
    /// Read one field by key.
    pub fn get(&self, key: ParamKey) -> f64 {
        match key {
            ParamKey::ShockMagnitude => self.shock_magnitude,
            ParamKey::TargetReserveRatio => self.target_reserve_ratio,
            ParamKey::YieldDistribution => self.yield_distribution,
        }
    }

    /// Overwrite one field by key.
    pub fn set(&mut self, key: ParamKey, value: f64) {
        match key {
            ParamKey::ShockMagnitude => self.shock_magnitude = value,
            ParamKey::TargetReserveRatio => self.target_reserve_ratio = value,
            ParamKey::YieldDistribution => self.yield_distribution = value,
        }
    }
}

impl Default for ParameterSet {
    /// The balanced preset doubles as the initial slider positions.
    fn default() -> Self {
        Preset::get(PresetName::Balanced).params()
    }
}

/// Addressable fields of [`ParameterSet`] for the by-name command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    ShockMagnitude,
    TargetReserveRatio,
    YieldDistribution,
}

impl ParamKey {
    /// Wire key for this parameter.
    pub fn key(self) -> &'static str {
        match self {
            ParamKey::ShockMagnitude => "shockMagnitude",
            ParamKey::TargetReserveRatio => "targetReserveRatio",
            ParamKey::YieldDistribution => "yieldDistribution",
        }
    }

    /// Parse a wire key. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<ParamKey> {
        match key {
            "shockMagnitude" => Some(ParamKey::ShockMagnitude),
            "targetReserveRatio" => Some(ParamKey::TargetReserveRatio),
            "yieldDistribution" => Some(ParamKey::YieldDistribution),
            _ => None,
        }
    }
}

/// Names of the three built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Conservative,
    Balanced,
    Aggressive,
}

impl PresetName {
    /// All preset names, in display order.
    pub const ALL: [PresetName; 3] = [
        PresetName::Conservative,
        PresetName::Balanced,
        PresetName::Aggressive,
    ];

    /// Wire key for this preset.
    pub fn key(self) -> &'static str {
        match self {
            PresetName::Conservative => "conservative",
            PresetName::Balanced => "balanced",
            PresetName::Aggressive => "aggressive",
        }
    }

    /// Parse a wire key. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<PresetName> {
        match key {
            "conservative" => Some(PresetName::Conservative),
            "balanced" => Some(PresetName::Balanced),
            "aggressive" => Some(PresetName::Aggressive),
            _ => None,
        }
    }
}

/// A named, immutable bundle of the three tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub name: PresetName,
    pub label: &'static str,
    pub shock_magnitude: f64,
    pub target_reserve_ratio: f64,
    pub yield_distribution: f64,
}

/// The three built-in presets, in display order.
pub const PRESETS: [Preset; 3] = [
    Preset {
        name: PresetName::Conservative,
        label: "Conservative",
        shock_magnitude: 10.0,
        target_reserve_ratio: 130.0,
        yield_distribution: 3.0,
    },
    Preset {
        name: PresetName::Balanced,
        label: "Balanced",
        shock_magnitude: 20.0,
        target_reserve_ratio: 110.0,
        yield_distribution: 5.0,
    },
    Preset {
        name: PresetName::Aggressive,
        label: "Aggressive",
        shock_magnitude: 35.0,
        target_reserve_ratio: 105.0,
        yield_distribution: 8.0,
    },
];

impl Preset {
    /// Get a built-in preset by name.
    pub fn get(name: PresetName) -> &'static Preset {
        &PRESETS[name as usize]
    }

    /// Look up a built-in preset by wire key. Returns `None` for unknown
    /// keys; callers treat that as a silent no-op.
    pub fn lookup(key: &str) -> Option<&'static Preset> {
        PresetName::from_key(key).map(Preset::get)
    }

    /// The parameter values this preset applies.
    pub fn params(&self) -> ParameterSet {
        ParameterSet {
            shock_magnitude: self.shock_magnitude,
            target_reserve_ratio: self.target_reserve_ratio,
            yield_distribution: self.yield_distribution,
        }
    }
}
