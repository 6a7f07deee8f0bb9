//! Indoor air-quality compliance rule.
//!
//! Classifies one set of environmental readings against the fixed regulatory
//! threshold table [`LIMITS`]. Pure logic: no I/O and no shared mutable state,
//! so [`compute_status`] may be called from any number of request handlers
//! concurrently.
//!
//! The verdict is binary. A measurement is [`ComplianceStatus::Compliant`]
//! only when every one of the ten checks holds. Comparisons use plain IEEE
//! semantics, so a NaN reading fails its check instead of raising an error.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Display label for a compliant measurement (source locale).
pub const COMPLIANT_LABEL: &str = "Conforme";
/// Display label for a non-compliant measurement (source locale).
pub const NON_COMPLIANT_LABEL: &str = "Não Conforme";

/// Two-valued compliance verdict.
///
/// Persisted as `compliant` / `non_compliant` in the `measurements.status`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

impl ComplianceStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non_compliant",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compliant => COMPLIANT_LABEL,
            Self::NonCompliant => NON_COMPLIANT_LABEL,
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::Compliant)
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "compliant" => Ok(Self::Compliant),
            "non_compliant" => Ok(Self::NonCompliant),
            other => Err(CoreError::Validation(format!(
                "Unknown compliance status: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The thirteen environmental readings of one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementValues {
    /// Relative humidity (%).
    pub humidity: f64,
    /// Air speed (m/s).
    pub air_speed: f64,
    /// Temperature (°C).
    pub temperature: f64,
    /// Indoor fungi (CFU/m³).
    pub fungi_internal: f64,
    /// Outdoor fungi (CFU/m³).
    pub fungi_external: f64,
    /// Indoor/outdoor fungi ratio.
    pub ie_ratio: f64,
    /// Aerodispersoids (µg/m³).
    pub aerodispersoids: f64,
    /// Indoor bacteria (CFU/m³).
    pub bacteria_internal: f64,
    /// Outdoor bacteria (CFU/m³).
    pub bacteria_external: f64,
    /// Indoor CO2 (ppm).
    pub co2_internal: f64,
    /// Outdoor CO2 (ppm).
    pub co2_external: f64,
    /// PM10 (µg/m³).
    pub pm10: f64,
    /// PM2.5 (µg/m³).
    pub pm25: f64,
}

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// Named regulatory bounds. All `*_max` bounds are inclusive, as are both ends
/// of the temperature and humidity ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdTable {
    pub aerodispersoids_max: f64,
    pub fungi_internal_max: f64,
    pub co2_max: f64,
    /// Maximum indoor-minus-outdoor CO2 difference.
    pub co2_differential_max: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub air_speed_max: f64,
    pub ie_ratio_max: f64,
    pub pm10_max: f64,
    pub pm25_max: f64,
    pub bacteria_internal_max: f64,
}

/// The threshold table every measurement is evaluated against.
///
/// Temperature spans both seasonal bands (20-22 °C winter, 23-26 °C summer).
pub const LIMITS: ThresholdTable = ThresholdTable {
    aerodispersoids_max: 80.0,
    fungi_internal_max: 750.0,
    co2_max: 1000.0,
    co2_differential_max: 700.0,
    temperature_min: 20.0,
    temperature_max: 26.0,
    humidity_min: 40.0,
    humidity_max: 60.0,
    air_speed_max: 0.25,
    ie_ratio_max: 1.5,
    pm10_max: 50.0,
    pm25_max: 25.0,
    bacteria_internal_max: 500.0,
};

// ---------------------------------------------------------------------------
// Parameter keys
// ---------------------------------------------------------------------------

pub const PARAM_AERODISPERSOIDS: &str = "aerodispersoids";
pub const PARAM_FUNGI_INTERNAL: &str = "fungi_internal";
/// Combined check over `co2_internal` and `co2_external`.
pub const PARAM_CO2: &str = "co2";
pub const PARAM_TEMPERATURE: &str = "temperature";
pub const PARAM_HUMIDITY: &str = "humidity";
pub const PARAM_AIR_SPEED: &str = "air_speed";
pub const PARAM_IE_RATIO: &str = "ie_ratio";
pub const PARAM_PM10: &str = "pm10";
pub const PARAM_PM25: &str = "pm25";
pub const PARAM_BACTERIA_INTERNAL: &str = "bacteria_internal";

/// Monitored checks in evaluation order.
pub const CHECKED_PARAMETERS: [&str; 10] = [
    PARAM_AERODISPERSOIDS,
    PARAM_FUNGI_INTERNAL,
    PARAM_CO2,
    PARAM_TEMPERATURE,
    PARAM_HUMIDITY,
    PARAM_AIR_SPEED,
    PARAM_IE_RATIO,
    PARAM_PM10,
    PARAM_PM25,
    PARAM_BACTERIA_INTERNAL,
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl ThresholdTable {
    /// Outcome of each of the ten checks, ordered as [`CHECKED_PARAMETERS`].
    pub fn checks(&self, v: &MeasurementValues) -> [bool; 10] {
        [
            v.aerodispersoids <= self.aerodispersoids_max,
            v.fungi_internal <= self.fungi_internal_max,
            (v.co2_internal - v.co2_external) <= self.co2_differential_max
                && v.co2_internal <= self.co2_max,
            v.temperature >= self.temperature_min && v.temperature <= self.temperature_max,
            v.humidity >= self.humidity_min && v.humidity <= self.humidity_max,
            v.air_speed <= self.air_speed_max,
            v.ie_ratio <= self.ie_ratio_max,
            v.pm10 <= self.pm10_max,
            v.pm25 <= self.pm25_max,
            v.bacteria_internal <= self.bacteria_internal_max,
        ]
    }

    /// Binary verdict for one measurement.
    pub fn status_of(&self, v: &MeasurementValues) -> ComplianceStatus {
        if self.checks(v).iter().all(|ok| *ok) {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::NonCompliant
        }
    }
}

/// Classify a measurement against [`LIMITS`].
pub fn compute_status(values: &MeasurementValues) -> ComplianceStatus {
    LIMITS.status_of(values)
}

// ---------------------------------------------------------------------------
// Per-parameter breakdown (reporting)
// ---------------------------------------------------------------------------

/// Result of one check, used to highlight offending values in the UI and in
/// measurement detail responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterCheck {
    pub parameter: &'static str,
    /// The reading the check is anchored on (`co2_internal` for the CO2 check).
    pub value: f64,
    /// Human-readable bound, e.g. `"20 ≤ x ≤ 26"`.
    pub bound: String,
    pub passed: bool,
}

/// Evaluate every check against [`LIMITS`] and describe each outcome.
pub fn check_parameters(v: &MeasurementValues) -> Vec<ParameterCheck> {
    let l = &LIMITS;
    let outcomes = l.checks(v);
    let anchors = [
        (v.aerodispersoids, format!("x ≤ {}", l.aerodispersoids_max)),
        (v.fungi_internal, format!("x ≤ {}", l.fungi_internal_max)),
        (
            v.co2_internal,
            format!(
                "x ≤ {} and x − external ≤ {}",
                l.co2_max, l.co2_differential_max
            ),
        ),
        (
            v.temperature,
            format!("{} ≤ x ≤ {}", l.temperature_min, l.temperature_max),
        ),
        (
            v.humidity,
            format!("{} ≤ x ≤ {}", l.humidity_min, l.humidity_max),
        ),
        (v.air_speed, format!("x ≤ {}", l.air_speed_max)),
        (v.ie_ratio, format!("x ≤ {}", l.ie_ratio_max)),
        (v.pm10, format!("x ≤ {}", l.pm10_max)),
        (v.pm25, format!("x ≤ {}", l.pm25_max)),
        (
            v.bacteria_internal,
            format!("x ≤ {}", l.bacteria_internal_max),
        ),
    ];

    CHECKED_PARAMETERS
        .iter()
        .zip(anchors)
        .zip(outcomes)
        .map(|((parameter, (value, bound)), passed)| ParameterCheck {
            parameter: *parameter,
            value,
            bound,
            passed,
        })
        .collect()
}

/// Keys of the checks a measurement fails. Empty iff the measurement is
/// compliant.
pub fn failed_parameters(v: &MeasurementValues) -> Vec<&'static str> {
    CHECKED_PARAMETERS
        .iter()
        .zip(LIMITS.checks(v))
        .filter(|(_, passed)| !passed)
        .map(|(parameter, _)| *parameter)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
