use crate::data::{EngineConfig, GeneratedClass};
use crate::error::EngineError;
use crate::repository::EntityRepository;
use crate::variables::VariableKey;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Generates human-readable group labels: two uppercase letters followed by
/// two digits, unique within one run.
pub struct GroupLabeler {
    rng: StdRng,
    used: HashSet<String>,
    scan_cursor: usize,
}

const LABEL_POOL: usize = 26 * 26 * 100;

impl GroupLabeler {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            used: HashSet::new(),
            scan_cursor: 0,
        }
    }

    /// Next unused label, or `None` once all 67 600 combinations are taken.
    pub fn next_label(&mut self) -> Option<String> {
        if self.used.len() >= LABEL_POOL {
            return None;
        }
        for _ in 0..64 {
            let label = self.random_label();
            if self.used.insert(label.clone()) {
                return Some(label);
            }
        }
        // Dense runs: scan from where the last scan stopped.
        while self.scan_cursor < LABEL_POOL {
            let label = label_at(self.scan_cursor);
            self.scan_cursor += 1;
            if self.used.insert(label.clone()) {
                return Some(label);
            }
        }
        None
    }

    fn random_label(&mut self) -> String {
        let a = self.rng.random_range(b'A'..=b'Z') as char;
        let b = self.rng.random_range(b'A'..=b'Z') as char;
        let n: u8 = self.rng.random_range(0..100);
        format!("{}{}{:02}", a, b, n)
    }
}

fn label_at(index: usize) -> String {
    let a = (b'A' + (index / (26 * 100)) as u8) as char;
    let b = (b'A' + (index / 100 % 26) as u8) as char;
    format!("{}{}{:02}", a, b, index % 100)
}

/// Outcome of turning a boolean assignment into class records.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub classes: Vec<GeneratedClass>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Resolves every chosen variable to a class record.
///
/// Minimum enrollment is re-checked here even though the solver already
/// forbids it, so an assignment can never surface an undersized class.
/// Unresolvable variables are recorded as errors, not silently dropped.
/// A feasible assignment with zero classes is legitimate and yields a
/// warning rather than an error.
pub fn extract(
    chosen: &[VariableKey],
    repo: &EntityRepository,
    config: &EngineConfig,
    labeler: &mut GroupLabeler,
) -> Extraction {
    let mut out = Extraction::default();

    for key in chosen {
        let (Some(slot), Some(cap)) = (repo.slot(key.slot_id), repo.capability(key.capability_id))
        else {
            out.errors.push(
                resolution_error(key, "slot or capability no longer present").to_string(),
            );
            continue;
        };
        let (Some(subject), Some(room), Some(teacher)) = (
            repo.subject(cap.subject_id),
            repo.room(key.room_id),
            repo.teacher(cap.teacher_id),
        ) else {
            out.errors.push(
                resolution_error(key, "subject, room or teacher no longer present").to_string(),
            );
            continue;
        };

        if subject.enrolled_count < config.minimum_enrollment {
            out.warnings.push(format!(
                "subject {} has too few students ({}) to open a class",
                subject.name, subject.enrolled_count
            ));
            continue;
        }

        let Some(group) = labeler.next_label() else {
            out.errors
                .push(EngineError::LabelPoolExhausted(out.classes.len()).to_string());
            break;
        };

        out.classes.push(GeneratedClass {
            group,
            day: slot.day,
            start_time: slot.start_time,
            end_time: slot.end_time,
            enrolled_count: subject.enrolled_count,
            subject_id: subject.id,
            room_id: room.id,
            teacher_id: teacher.id,
        });
    }

    out.classes
        .sort_by_key(|c| (c.day, c.start_time, c.room_id, c.teacher_id));

    for error in &out.errors {
        warn!("{}", error);
    }
    if out.classes.is_empty() {
        out.warnings
            .push("no class satisfies every constraint".to_string());
    }

    out
}

fn resolution_error(key: &VariableKey, detail: &str) -> EngineError {
    EngineError::Resolution {
        slot_id: key.slot_id,
        room_id: key.room_id,
        capability_id: key.capability_id,
        detail: detail.to_string(),
    }
}
