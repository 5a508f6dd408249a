//! Shapes of the immutable program snapshot captured at publish time.
//!
//! The snapshot is stored as JSON and only ever read by the clone worker. Parsing
//! it into these types is the schema check: anything that does not fit is rejected
//! before a single destination row is written.

use serde::de::DeserializeOwned;

/// Upper bound on workouts in one strength week.
pub const MAX_WORKOUTS_PER_WEEK: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot does not match the {kind} schema: {source}")]
    Schema {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot has no weeks")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthSnapshot {
    pub weeks: Vec<StrengthWeek>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthWeek {
    pub week_number: i32,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub name: String,
    pub day_number: i32,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub exercise_definition_id: String,
    pub order: i32,
    pub exercise_group: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub prescribed_sets: Vec<PrescribedSet>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescribedSet {
    pub set_number: i32,
    pub reps: i32,
    pub weight: Option<f64>,
    pub rpe: Option<f64>,
    pub rir: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardioSnapshot {
    pub weeks: Vec<CardioWeek>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardioWeek {
    pub week_number: i32,
    #[serde(default)]
    pub sessions: Vec<CardioSession>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardioSession {
    pub day_number: i32,
    pub name: String,
    pub description: Option<String>,
    pub target_duration: i32,
    pub intensity_zone: Option<i32>,
    pub equipment: Option<String>,
    #[serde(rename = "targetHRRange")]
    pub target_hr_range: Option<serde_json::Value>,
    pub target_power_range: Option<serde_json::Value>,
    pub interval_structure: Option<serde_json::Value>,
    pub notes: Option<String>,
}

fn parse<T: DeserializeOwned>(kind: &'static str, value: serde_json::Value) -> Result<T, SnapshotError> {
    serde_json::from_value(value).map_err(|source| SnapshotError::Schema { kind, source })
}

impl StrengthSnapshot {
    pub fn from_json(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let snapshot: Self = parse("strength", value)?;
        if snapshot.weeks.is_empty() {
            return Err(SnapshotError::Empty);
        }
        Ok(snapshot)
    }
}

impl CardioSnapshot {
    pub fn from_json(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let snapshot: Self = parse("cardio", value)?;
        if snapshot.weeks.is_empty() {
            return Err(SnapshotError::Empty);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_strength_snapshot_with_optional_fields_absent() {
        let v = json!({
            "weeks": [{
                "weekNumber": 1,
                "workouts": [{
                    "name": "Push",
                    "dayNumber": 1,
                    "exercises": [{
                        "name": "Bench Press",
                        "exerciseDefinitionId": "ex_bench",
                        "order": 0,
                        "prescribedSets": [{ "setNumber": 1, "reps": 5, "weight": 100.0 }]
                    }]
                }]
            }]
        });
        let s = StrengthSnapshot::from_json(v).unwrap();
        let ex = &s.weeks[0].workouts[0].exercises[0];
        assert_eq!(ex.exercise_group, None);
        assert_eq!(ex.prescribed_sets[0].rpe, None);
        assert_eq!(ex.prescribed_sets[0].weight, Some(100.0));
    }

    #[test]
    fn parses_cardio_ranges_verbatim() {
        let v = json!({
            "weeks": [{
                "weekNumber": 1,
                "sessions": [{
                    "dayNumber": 2,
                    "name": "Tempo",
                    "targetDuration": 40,
                    "intensityZone": 3,
                    "targetHRRange": { "min": 140, "max": 155 }
                }]
            }]
        });
        let s = CardioSnapshot::from_json(v).unwrap();
        let session = &s.weeks[0].sessions[0];
        assert_eq!(session.target_hr_range, Some(json!({ "min": 140, "max": 155 })));
        assert_eq!(session.target_power_range, None);
    }

    #[test]
    fn empty_weeks_are_rejected() {
        assert!(matches!(
            StrengthSnapshot::from_json(json!({ "weeks": [] })),
            Err(SnapshotError::Empty)
        ));
        assert!(matches!(
            CardioSnapshot::from_json(json!({ "weeks": [] })),
            Err(SnapshotError::Empty)
        ));
    }

    #[test]
    fn wrong_shape_is_a_schema_error() {
        // week without weekNumber
        let err = StrengthSnapshot::from_json(json!({ "weeks": [{ "sessions": [] }] })).unwrap_err();
        assert!(matches!(err, SnapshotError::Schema { kind: "strength", .. }));

        let err = CardioSnapshot::from_json(json!({ "program": {} })).unwrap_err();
        assert!(matches!(err, SnapshotError::Schema { kind: "cardio", .. }));
    }
}
