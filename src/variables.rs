use crate::data::{CapabilityId, RoomId, SlotId};
use crate::repository::EntityRepository;
use log::info;

/// Identity of one boolean decision: "this capability is taught in this room
/// during this slot". Decoupled from input row order; only the ids matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableKey {
    pub slot_id: SlotId,
    pub room_id: RoomId,
    pub capability_id: CapabilityId,
}

/// The candidate variable set: the full cross product of
/// (availability slot) x (room) x (teaching capability).
///
/// No eligibility filtering happens here; the constraint engine prunes the
/// space. Size is O(|slots| * |rooms| * |capabilities|) and governs everything
/// downstream, so it is logged for callers that need to bound run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpace {
    keys: Vec<VariableKey>,
}

impl VariableSpace {
    pub fn build(repo: &EntityRepository) -> Self {
        let bound = repo.slot_count() * repo.room_count() * repo.capability_count();
        let mut keys = Vec::with_capacity(bound);
        for slot in repo.slots() {
            for room in repo.rooms() {
                for cap in repo.capabilities() {
                    keys.push(VariableKey {
                        slot_id: slot.id,
                        room_id: room.id,
                        capability_id: cap.id,
                    });
                }
            }
        }
        info!(
            "Variable space: {} candidate variables ({} slots x {} rooms x {} capabilities)",
            keys.len(),
            repo.slot_count(),
            repo.room_count(),
            repo.capability_count()
        );
        Self { keys }
    }

    pub fn keys(&self) -> &[VariableKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        AvailabilitySlot, Room, SchedulingInput, Subject, Teacher, TeachingCapability, Weekday,
    };

    fn input(slots: u32, rooms: u32, caps: u32) -> SchedulingInput {
        SchedulingInput {
            teachers: vec![Teacher {
                id: 1,
                name: "T".into(),
                contract_type: "adjunct".into(),
                status: "active".into(),
            }],
            subjects: vec![Subject {
                id: 1,
                code: "S".into(),
                name: "S".into(),
                enrolled_count: 30,
                blocks_required: 2,
            }],
            rooms: (0..rooms)
                .map(|i| Room {
                    id: i,
                    code: format!("R{}", i),
                    capacity: 40,
                    kind: "lecture".into(),
                })
                .collect(),
            availability_slots: (0..slots)
                .map(|i| AvailabilitySlot {
                    id: i,
                    teacher_id: 1,
                    day: Weekday::Monday,
                    start_time: 360 + 45 * i,
                    end_time: 405 + 45 * i,
                })
                .collect(),
            capabilities: (0..caps)
                .map(|i| TeachingCapability {
                    id: i,
                    teacher_id: 1,
                    subject_id: 1,
                    experience_score: 5,
                    quality_score: 3,
                })
                .collect(),
        }
    }

    #[test]
    fn full_cross_product_is_enumerated() {
        let (repo, _) = crate::repository::EntityRepository::build(&input(3, 4, 2));
        let space = VariableSpace::build(&repo);
        assert_eq!(space.len(), 3 * 4 * 2);
    }

    #[test]
    fn keys_are_sorted_and_unique() {
        let (repo, _) = crate::repository::EntityRepository::build(&input(2, 2, 2));
        let space = VariableSpace::build(&repo);
        let mut sorted = space.keys().to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), space.len());
    }

    #[test]
    fn construction_is_idempotent() {
        let data = input(2, 3, 1);
        let (repo_a, _) = crate::repository::EntityRepository::build(&data);
        let (repo_b, _) = crate::repository::EntityRepository::build(&data);
        assert_eq!(
            VariableSpace::build(&repo_a),
            VariableSpace::build(&repo_b)
        );
    }

    #[test]
    fn empty_entity_set_yields_empty_space() {
        let mut data = input(2, 2, 2);
        data.rooms.clear();
        let (repo, _) = crate::repository::EntityRepository::build(&data);
        assert!(VariableSpace::build(&repo).is_empty());
    }
}
