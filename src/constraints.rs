use crate::data::EngineConfig;
use crate::repository::EntityRepository;
use crate::variables::{VariableKey, VariableSpace};
use good_lp::{Constraint, Expression, Variable, constraint};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Everything a constraint builder needs to see: the entity views, the
/// candidate set, the solver variables keyed by candidate, and the run config.
pub struct ModelContext<'a> {
    pub repo: &'a EntityRepository,
    pub space: &'a VariableSpace,
    pub vars: &'a BTreeMap<VariableKey, Variable>,
    pub config: &'a EngineConfig,
}

/// One named hard constraint, expanded to its posted restrictions.
pub struct NamedConstraints {
    pub name: &'static str,
    pub constraints: Vec<Constraint>,
}

/// The ordered hard-constraint list. All are conjunctive, so order does not
/// change the feasible set; structural constraints come first so the solver
/// presolves on them before the weighted ones.
pub fn hard_constraints(ctx: &ModelContext) -> Vec<NamedConstraints> {
    vec![
        teacher_exclusivity(ctx),
        room_exclusivity(ctx),
        availability_match(ctx),
        capacity_bound(ctx),
        minimum_enrollment(ctx),
    ]
}

/// True when the capability's subject fits the room at all. Used by the
/// solver to detect a space with no realizable class before solving.
pub fn capacity_admissible(repo: &EntityRepository, key: &VariableKey) -> bool {
    let Some(cap) = repo.capability(key.capability_id) else {
        return false;
    };
    let Some(subject) = repo.subject(cap.subject_id) else {
        return false;
    };
    let Some(room) = repo.room(key.room_id) else {
        return false;
    };
    subject.enrolled_count <= room.capacity
}

// Variables tied to one teacher inside one slot, across all rooms.
fn teacher_vars_in_slot(
    ctx: &ModelContext,
    slot_id: u32,
    teacher_id: u32,
) -> Vec<Variable> {
    let mut vars = Vec::new();
    for cap_id in ctx.repo.capabilities_of_teacher(teacher_id) {
        for room in ctx.repo.rooms() {
            let key = VariableKey {
                slot_id,
                room_id: room.id,
                capability_id: *cap_id,
            };
            if let Some(v) = ctx.vars.get(&key) {
                vars.push(*v);
            }
        }
    }
    vars
}

// Variables inside one (slot, room) cell, across all capabilities.
fn room_vars_in_slot(ctx: &ModelContext, slot_id: u32, room_id: u32) -> Vec<Variable> {
    let mut vars = Vec::new();
    for cap in ctx.repo.capabilities() {
        let key = VariableKey {
            slot_id,
            room_id,
            capability_id: cap.id,
        };
        if let Some(v) = ctx.vars.get(&key) {
            vars.push(*v);
        }
    }
    vars
}

fn sum(vars: &[Variable]) -> Expression {
    vars.iter()
        .fold(Expression::from(0.0), |acc, v| acc + *v)
}

/// A teacher gives at most one class at a time: per (slot, teacher) across
/// all rooms, and per pair of overlapping slot records of the same teacher.
///
/// The cross-slot part is posted pairwise; overlap is not transitive, so a
/// single sum over every slot touching a given one would also forbid
/// disjoint pairs.
fn teacher_exclusivity(ctx: &ModelContext) -> NamedConstraints {
    let mut constraints = Vec::new();
    for slot in ctx.repo.slots() {
        for teacher in ctx.repo.teachers() {
            let vars = teacher_vars_in_slot(ctx, slot.id, teacher.id);
            if vars.len() > 1 {
                let teacher_load = sum(&vars);
                constraints.push(constraint!(teacher_load <= 1));
            }
        }
    }
    for teacher in ctx.repo.teachers() {
        for (a, b) in ctx.repo.slots_of_teacher(teacher.id).iter().tuple_combinations() {
            let (Some(slot_a), Some(slot_b)) = (ctx.repo.slot(*a), ctx.repo.slot(*b)) else {
                continue;
            };
            if !slot_a.overlaps(slot_b) {
                continue;
            }
            let mut vars = teacher_vars_in_slot(ctx, *a, teacher.id);
            vars.extend(teacher_vars_in_slot(ctx, *b, teacher.id));
            if !vars.is_empty() {
                let teacher_load = sum(&vars);
                constraints.push(constraint!(teacher_load <= 1));
            }
        }
    }
    NamedConstraints {
        name: "teacher exclusivity",
        constraints,
    }
}

/// A room hosts at most one class at a time: per (slot, room) across all
/// capabilities, and per pair of overlapping slot records (any teachers)
/// sharing the room.
fn room_exclusivity(ctx: &ModelContext) -> NamedConstraints {
    let mut constraints = Vec::new();
    for slot in ctx.repo.slots() {
        for room in ctx.repo.rooms() {
            let vars = room_vars_in_slot(ctx, slot.id, room.id);
            if vars.len() > 1 {
                let room_load = sum(&vars);
                constraints.push(constraint!(room_load <= 1));
            }
        }
    }
    for (slot_a, slot_b) in ctx.repo.slots().tuple_combinations() {
        if !slot_a.overlaps(slot_b) {
            continue;
        }
        for room in ctx.repo.rooms() {
            let mut vars = room_vars_in_slot(ctx, slot_a.id, room.id);
            vars.extend(room_vars_in_slot(ctx, slot_b.id, room.id));
            if !vars.is_empty() {
                let room_load = sum(&vars);
                constraints.push(constraint!(room_load <= 1));
            }
        }
    }
    NamedConstraints {
        name: "room exclusivity",
        constraints,
    }
}

/// Only same-teacher (slot, capability) pairings are eligible; every other
/// variable is forced false across all rooms.
fn availability_match(ctx: &ModelContext) -> NamedConstraints {
    let mut constraints = Vec::new();
    for key in ctx.space.keys() {
        let (Some(slot), Some(cap)) = (
            ctx.repo.slot(key.slot_id),
            ctx.repo.capability(key.capability_id),
        ) else {
            continue;
        };
        if cap.teacher_id != slot.teacher_id {
            if let Some(v) = ctx.vars.get(key) {
                let ineligible = Expression::from(*v);
                constraints.push(constraint!(ineligible == 0));
            }
        }
    }
    NamedConstraints {
        name: "availability match",
        constraints,
    }
}

/// Per (room, slot), the enrollment-weighted sum of chosen variables stays
/// within the room's capacity.
fn capacity_bound(ctx: &ModelContext) -> NamedConstraints {
    let mut constraints = Vec::new();
    for room in ctx.repo.rooms() {
        for slot in ctx.repo.slots() {
            let mut load = Expression::from(0.0);
            let mut terms = 0usize;
            for cap in ctx.repo.capabilities() {
                let key = VariableKey {
                    slot_id: slot.id,
                    room_id: room.id,
                    capability_id: cap.id,
                };
                let (Some(v), Some(subject)) =
                    (ctx.vars.get(&key), ctx.repo.subject(cap.subject_id))
                else {
                    continue;
                };
                load = load + (subject.enrolled_count as f64) * Expression::from(*v);
                terms += 1;
            }
            if terms > 0 {
                let capacity = room.capacity as f64;
                constraints.push(constraint!(load <= capacity));
            }
        }
    }
    NamedConstraints {
        name: "capacity bound",
        constraints,
    }
}

/// Variables whose subject enrollment is below the configured minimum are
/// forced false, so the solver never pays for forbidden assignments.
fn minimum_enrollment(ctx: &ModelContext) -> NamedConstraints {
    let mut constraints = Vec::new();
    for key in ctx.space.keys() {
        let Some(cap) = ctx.repo.capability(key.capability_id) else {
            continue;
        };
        let Some(subject) = ctx.repo.subject(cap.subject_id) else {
            continue;
        };
        if subject.enrolled_count < ctx.config.minimum_enrollment {
            if let Some(v) = ctx.vars.get(key) {
                let undersized = Expression::from(*v);
                constraints.push(constraint!(undersized == 0));
            }
        }
    }
    NamedConstraints {
        name: "minimum enrollment",
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        AvailabilitySlot, Room, SchedulingInput, Subject, Teacher, TeachingCapability, Weekday,
    };
    use good_lp::{ProblemVariables, variable};

    fn two_teacher_input() -> SchedulingInput {
        SchedulingInput {
            teachers: vec![
                Teacher {
                    id: 1,
                    name: "A".into(),
                    contract_type: "full-time".into(),
                    status: "active".into(),
                },
                Teacher {
                    id: 2,
                    name: "B".into(),
                    contract_type: "adjunct".into(),
                    status: "active".into(),
                },
            ],
            subjects: vec![Subject {
                id: 10,
                code: "S10".into(),
                name: "Algebra".into(),
                enrolled_count: 30,
                blocks_required: 2,
            }],
            rooms: vec![Room {
                id: 100,
                code: "R100".into(),
                capacity: 35,
                kind: "lecture".into(),
            }],
            availability_slots: vec![AvailabilitySlot {
                id: 1000,
                teacher_id: 1,
                day: Weekday::Monday,
                start_time: 360,
                end_time: 450,
            }],
            capabilities: vec![
                TeachingCapability {
                    id: 500,
                    teacher_id: 1,
                    subject_id: 10,
                    experience_score: 5,
                    quality_score: 3,
                },
                TeachingCapability {
                    id: 501,
                    teacher_id: 2,
                    subject_id: 10,
                    experience_score: 9,
                    quality_score: 5,
                },
            ],
        }
    }

    fn with_context<R>(
        input: &SchedulingInput,
        config: &EngineConfig,
        f: impl FnOnce(&ModelContext) -> R,
    ) -> R {
        let (repo, _) = EntityRepository::build(input);
        let space = VariableSpace::build(&repo);
        let mut problem = ProblemVariables::new();
        let raw = problem.add_vector(variable().binary(), space.len());
        let vars: BTreeMap<VariableKey, Variable> =
            space.keys().iter().copied().zip(raw).collect();
        let ctx = ModelContext {
            repo: &repo,
            space: &space,
            vars: &vars,
            config,
        };
        f(&ctx)
    }

    #[test]
    fn constraint_order_is_structural_first() {
        let config = EngineConfig::default();
        with_context(&two_teacher_input(), &config, |ctx| {
            let names: Vec<_> = hard_constraints(ctx).iter().map(|s| s.name).collect();
            assert_eq!(
                names,
                vec![
                    "teacher exclusivity",
                    "room exclusivity",
                    "availability match",
                    "capacity bound",
                    "minimum enrollment"
                ]
            );
        });
    }

    #[test]
    fn availability_mismatch_forces_variables_false() {
        let config = EngineConfig::default();
        with_context(&two_teacher_input(), &config, |ctx| {
            let sets = hard_constraints(ctx);
            let availability = sets.iter().find(|s| s.name == "availability match").unwrap();
            // capability 501 belongs to teacher 2, who owns no slot
            assert_eq!(availability.constraints.len(), 1);
        });
    }

    #[test]
    fn low_enrollment_forces_every_variable_false() {
        let mut input = two_teacher_input();
        input.subjects[0].enrolled_count = 10;
        let config = EngineConfig::default();
        with_context(&input, &config, |ctx| {
            let sets = hard_constraints(ctx);
            let minimum = sets.iter().find(|s| s.name == "minimum enrollment").unwrap();
            assert_eq!(minimum.constraints.len(), ctx.space.len());
        });
    }

    #[test]
    fn capacity_admissibility_tracks_room_capacity() {
        let mut input = two_teacher_input();
        input.rooms[0].capacity = 20;
        let (repo, _) = EntityRepository::build(&input);
        let space = VariableSpace::build(&repo);
        assert!(space.keys().iter().all(|k| !capacity_admissible(&repo, k)));

        input.rooms[0].capacity = 30;
        let (repo, _) = EntityRepository::build(&input);
        let space = VariableSpace::build(&repo);
        assert!(space.keys().iter().all(|k| capacity_admissible(&repo, k)));
    }

    #[test]
    fn room_exclusivity_covers_overlapping_slot_records() {
        let mut input = two_teacher_input();
        // second teacher overlaps the first in a different slot record
        input.availability_slots.push(AvailabilitySlot {
            id: 1001,
            teacher_id: 2,
            day: Weekday::Monday,
            start_time: 400,
            end_time: 490,
        });
        let config = EngineConfig::default();
        with_context(&input, &config, |ctx| {
            let sets = hard_constraints(ctx);
            let rooms = sets.iter().find(|s| s.name == "room exclusivity").unwrap();
            // one per (slot, room) cell with >1 candidate, plus one for the
            // overlapping pair in the shared room
            assert_eq!(rooms.constraints.len(), 3);
        });
    }
}
