//! In-memory program state owned by the autosave controller.

use serde::{Deserialize, Serialize};

use super::{CanonicalWorkout, Program, ProgramMetadata, ProgramSpec, WorkoutRecord};

/// Everything an editor holds for one program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramState {
    pub program_id: u64,
    pub spec: ProgramSpec,
    pub metadata: ProgramMetadata,
    /// Reference and generated workouts in display order
    pub workouts: Vec<CanonicalWorkout>,
}

impl ProgramState {
    /// Builds a state from a persisted program and its workout records.
    pub fn from_records(program: &Program, records: &[WorkoutRecord]) -> Self {
        Self {
            program_id: program.id,
            spec: program.spec.clone(),
            metadata: program.metadata.clone(),
            workouts: records.iter().map(CanonicalWorkout::from).collect(),
        }
    }

    /// Compares two states ignoring store-assigned ids.
    pub fn same_content(&self, other: &ProgramState) -> bool {
        self.program_id == other.program_id
            && self.spec == other.spec
            && self.metadata == other.metadata
            && self.workouts.len() == other.workouts.len()
            && self
                .workouts
                .iter()
                .zip(&other.workouts)
                .all(|(a, b)| a.same_content(b))
    }

    pub fn generated(&self) -> impl Iterator<Item = &CanonicalWorkout> {
        self.workouts.iter().filter(|w| !w.is_reference)
    }

    pub fn references(&self) -> impl Iterator<Item = &CanonicalWorkout> {
        self.workouts.iter().filter(|w| w.is_reference)
    }

    /// Copies ids from a saved snapshot onto positions whose content still
    /// matches. Generated workouts that no longer match lose their id: the
    /// save replaced every generated record.
    pub fn adopt_ids_from(&mut self, saved: &ProgramState) {
        for (index, current) in self.workouts.iter_mut().enumerate() {
            match saved.workouts.get(index) {
                Some(snapshot) if current.same_content(snapshot) => {
                    current.persisted_id = snapshot.persisted_id;
                }
                _ if !current.is_reference => current.persisted_id = None,
                _ => {}
            }
        }
    }
}
