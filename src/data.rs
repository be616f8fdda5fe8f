use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type TeacherId = u32;
pub type SubjectId = u32;
pub type RoomId = u32;
pub type SlotId = u32;
pub type CapabilityId = u32;

/// Wall-clock time of day in minutes since midnight, comparable within a day.
pub type ClockTime = u32;

/// Day of the week an availability slot or class falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A teacher on record. Contract type and status are descriptive only.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub contract_type: String,
    pub status: String,
}

/// A subject with its enrollment, which drives capacity and minimum-enrollment checks.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub code: String,
    pub name: String,
    pub enrolled_count: u32,
    pub blocks_required: u32,
}

/// A physical room with a given capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub code: String,
    pub capacity: u32,
    pub kind: String,
}

/// One interval during which a specific teacher could teach.
///
/// Slots arrive in consecutive pairs upstream but are treated as independent
/// intervals here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: SlotId,
    pub teacher_id: TeacherId,
    pub day: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl AvailabilitySlot {
    /// Two slots overlap when they share a day and their intervals intersect.
    pub fn overlaps(&self, other: &AvailabilitySlot) -> bool {
        self.day == other.day
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

/// A teacher-subject pairing establishing eligibility to teach that subject.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingCapability {
    pub id: CapabilityId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub experience_score: u32,
    pub quality_score: u32,
}

/// The complete input snapshot for one scheduling run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub rooms: Vec<Room>,
    pub availability_slots: Vec<AvailabilitySlot>,
    pub capabilities: Vec<TeachingCapability>,
}

/// Tunable knobs for one run.
///
/// The objective adds a coverage term (one per scheduled class) and a quality
/// term (experience + quality score per scheduled class), both weighted 1.0 by
/// default. The quality term scales with the scores in the input rather than
/// with class count, so callers that care should re-normalize via the weights.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Subjects below this enrollment never open a class.
    pub minimum_enrollment: u32,
    /// Wall-clock budget for the solver, in seconds. `None` runs to proven optimality.
    pub time_budget_secs: Option<f64>,
    pub coverage_weight: f64,
    pub quality_weight: f64,
    /// Seeds both the solver and group-label generation, for reproducible runs.
    pub random_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minimum_enrollment: 25,
            time_budget_secs: None,
            coverage_weight: 1.0,
            quality_weight: 1.0,
            random_seed: 1234,
        }
    }
}

/// Terminal state of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Global optimum proven.
    Optimal,
    /// A valid assignment found, optimality unproven (time budget hit).
    Feasible,
    /// No assignment satisfies all hard constraints.
    Infeasible,
    /// Budget exhausted or solver failure with no feasible assignment found.
    Unknown,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

/// A single scheduled class, the externally visible output record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedClass {
    pub group: String,
    pub day: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub enrolled_count: u32,
    pub subject_id: SubjectId,
    pub room_id: RoomId,
    pub teacher_id: TeacherId,
}

/// The structured result of one run. Always returned in full; per-item
/// problems land in `warnings`/`errors` rather than aborting the run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    pub status: SolveStatus,
    pub generated_classes: Vec<GeneratedClass>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Weekday, start: ClockTime, end: ClockTime) -> AvailabilitySlot {
        AvailabilitySlot {
            id: 1,
            teacher_id: 1,
            day,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn overlap_requires_same_day() {
        let a = slot(Weekday::Monday, 360, 450);
        let b = slot(Weekday::Tuesday, 360, 450);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&a.clone()));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = slot(Weekday::Monday, 360, 405);
        let b = slot(Weekday::Monday, 405, 450);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn partial_overlap_is_symmetric() {
        let a = slot(Weekday::Friday, 360, 450);
        let b = slot(Weekday::Friday, 400, 500);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&SolveStatus::Optimal).unwrap(),
            "\"OPTIMAL\""
        );
        assert_eq!(
            serde_json::to_string(&SolveStatus::Infeasible).unwrap(),
            "\"INFEASIBLE\""
        );
    }

    #[test]
    fn result_uses_camel_case_keys() {
        let result = SolveResult {
            status: SolveStatus::Feasible,
            generated_classes: vec![],
            warnings: vec![],
            errors: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("generatedClasses").is_some());
        assert_eq!(json["status"], "FEASIBLE");
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.minimum_enrollment, 25);
        assert_eq!(config.coverage_weight, 1.0);
        assert_eq!(config.quality_weight, 1.0);
        assert!(config.time_budget_secs.is_none());
    }
}
