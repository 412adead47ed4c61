//! The `UnitStore` — run state for every unit in the swarm.

use fls_core::{CoreError, CoreResult, Frame, UnitId};

use crate::UnitRunState;

/// Arena of [`UnitRunState`], indexed by `UnitId`.
///
/// `states[i].unit == UnitId(i)` always holds.  Only the driver mutates the
/// store; under the `parallel` feature it hands out disjoint `&mut` slots
/// through [`states_mut`](Self::states_mut).
#[derive(Clone, Debug, Default)]
pub struct UnitStore {
    states: Vec<UnitRunState>,
}

impl UnitStore {
    /// A store of `count` units with ids `0..count`.
    pub fn new(count: usize) -> Self {
        let states = (0..count as u32).map(|i| UnitRunState::new(UnitId(i))).collect();
        Self { states }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, unit: UnitId) -> CoreResult<&UnitRunState> {
        self.states.get(unit.index()).ok_or(CoreError::UnitNotFound(unit))
    }

    pub fn get_mut(&mut self, unit: UnitId) -> CoreResult<&mut UnitRunState> {
        self.states.get_mut(unit.index()).ok_or(CoreError::UnitNotFound(unit))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitRunState> {
        self.states.iter()
    }

    pub fn states(&self) -> &[UnitRunState] {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut [UnitRunState] {
        &mut self.states
    }

    /// Put every unit at the start of a new segment.
    pub fn enter_segment(&mut self, start: Frame) {
        for state in &mut self.states {
            state.enter_segment(start);
        }
    }
}
