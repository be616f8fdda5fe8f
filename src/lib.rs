//! Timetable assignment engine.
//!
//! Assigns academic classes to (time slot, room, teacher) triples under hard
//! constraints — no double-booking, room capacity, teacher availability,
//! minimum enrollment — while maximizing the number of classes scheduled,
//! weighted by teacher experience and quality scores. The search runs as a
//! boolean ILP over the full (slot, room, capability) cross product, solved
//! with HiGHS through `good_lp`.
//!
//! Each run is a self-contained transaction over one input snapshot:
//! repository, variable space, solve, extraction. Concurrent runs over
//! different snapshots need no synchronization.

pub mod constraints;
pub mod data;
pub mod error;
pub mod extract;
pub mod objective;
pub mod repository;
pub mod server;
pub mod sink;
pub mod solver;
pub mod variables;
