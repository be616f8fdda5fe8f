use crate::data::{
    AvailabilitySlot, CapabilityId, Room, RoomId, SchedulingInput, SlotId, Subject, SubjectId,
    Teacher, TeacherId, TeachingCapability,
};
use crate::error::EngineError;
use itertools::Itertools;
use log::{info, warn};
use std::collections::BTreeMap;

/// Typed, indexed views over one input snapshot.
///
/// Primary arenas are keyed by id; secondary indices cover the foreign-key
/// lookups the constraint engine needs (capabilities by teacher and subject,
/// slots by teacher). BTreeMaps keep iteration order deterministic, so two
/// builds from the same snapshot enumerate entities identically.
///
/// Records with a duplicate id or a dangling foreign id are dropped with one
/// warning each; a single bad record never blocks the run.
#[derive(Debug, Clone)]
pub struct EntityRepository {
    teachers: BTreeMap<TeacherId, Teacher>,
    subjects: BTreeMap<SubjectId, Subject>,
    rooms: BTreeMap<RoomId, Room>,
    slots: BTreeMap<SlotId, AvailabilitySlot>,
    capabilities: BTreeMap<CapabilityId, TeachingCapability>,
    capabilities_by_teacher: BTreeMap<TeacherId, Vec<CapabilityId>>,
    capabilities_by_subject: BTreeMap<SubjectId, Vec<CapabilityId>>,
    slots_by_teacher: BTreeMap<TeacherId, Vec<SlotId>>,
}

impl EntityRepository {
    pub fn build(input: &SchedulingInput) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let teachers = index_unique(
            input.teachers.iter().map(|t| (t.id, t.clone())),
            "teacher",
            &mut warnings,
        );
        let subjects = index_unique(
            input.subjects.iter().map(|s| (s.id, s.clone())),
            "subject",
            &mut warnings,
        );
        let rooms = index_unique(
            input.rooms.iter().map(|r| (r.id, r.clone())),
            "room",
            &mut warnings,
        );

        // Slots and capabilities must reference loaded teachers/subjects.
        let mut slots: BTreeMap<SlotId, AvailabilitySlot> = BTreeMap::new();
        for slot in &input.availability_slots {
            if !teachers.contains_key(&slot.teacher_id) {
                drop_record(
                    format!(
                        "availability slot {} references unknown teacher {}",
                        slot.id, slot.teacher_id
                    ),
                    &mut warnings,
                );
                continue;
            }
            if slots.contains_key(&slot.id) {
                drop_record(
                    format!("duplicate availability slot id {}", slot.id),
                    &mut warnings,
                );
                continue;
            }
            slots.insert(slot.id, slot.clone());
        }

        let mut capabilities: BTreeMap<CapabilityId, TeachingCapability> = BTreeMap::new();
        for cap in &input.capabilities {
            if !teachers.contains_key(&cap.teacher_id) {
                drop_record(
                    format!(
                        "capability {} references unknown teacher {}",
                        cap.id, cap.teacher_id
                    ),
                    &mut warnings,
                );
                continue;
            }
            if !subjects.contains_key(&cap.subject_id) {
                drop_record(
                    format!(
                        "capability {} references unknown subject {}",
                        cap.id, cap.subject_id
                    ),
                    &mut warnings,
                );
                continue;
            }
            if capabilities.contains_key(&cap.id) {
                drop_record(format!("duplicate capability id {}", cap.id), &mut warnings);
                continue;
            }
            capabilities.insert(cap.id, cap.clone());
        }

        let capabilities_by_teacher = capabilities
            .values()
            .map(|c| (c.teacher_id, c.id))
            .into_group_map()
            .into_iter()
            .collect();
        let capabilities_by_subject = capabilities
            .values()
            .map(|c| (c.subject_id, c.id))
            .into_group_map()
            .into_iter()
            .collect();
        let slots_by_teacher = slots
            .values()
            .map(|s| (s.teacher_id, s.id))
            .into_group_map()
            .into_iter()
            .collect();

        info!(
            "Repository built: {} teachers, {} subjects, {} rooms, {} slots, {} capabilities ({} records dropped)",
            teachers.len(),
            subjects.len(),
            rooms.len(),
            slots.len(),
            capabilities.len(),
            warnings.len()
        );

        (
            Self {
                teachers,
                subjects,
                rooms,
                slots,
                capabilities,
                capabilities_by_teacher,
                capabilities_by_subject,
                slots_by_teacher,
            },
            warnings,
        )
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.get(&id)
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn slot(&self, id: SlotId) -> Option<&AvailabilitySlot> {
        self.slots.get(&id)
    }

    pub fn capability(&self, id: CapabilityId) -> Option<&TeachingCapability> {
        self.capabilities.get(&id)
    }

    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.values()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn slots(&self) -> impl Iterator<Item = &AvailabilitySlot> + Clone {
        self.slots.values()
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &TeachingCapability> {
        self.capabilities.values()
    }

    pub fn capabilities_of_teacher(&self, id: TeacherId) -> &[CapabilityId] {
        self.capabilities_by_teacher
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn capabilities_of_subject(&self, id: SubjectId) -> &[CapabilityId] {
        self.capabilities_by_subject
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn slots_of_teacher(&self, id: TeacherId) -> &[SlotId] {
        self.slots_by_teacher
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn capability_count(&self) -> usize {
        self.capabilities.len()
    }
}

fn index_unique<T>(
    records: impl Iterator<Item = (u32, T)>,
    kind: &str,
    warnings: &mut Vec<String>,
) -> BTreeMap<u32, T> {
    let mut map = BTreeMap::new();
    for (id, record) in records {
        if map.contains_key(&id) {
            drop_record(format!("duplicate {} id {}", kind, id), warnings);
            continue;
        }
        map.insert(id, record);
    }
    map
}

fn drop_record(detail: String, warnings: &mut Vec<String>) {
    let err = EngineError::MalformedInput(detail);
    warn!("{}", err);
    warnings.push(err.to_string());
}
