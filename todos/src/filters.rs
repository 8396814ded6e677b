//! Filters slice: what the todo list view should show.
//!
//! A deliberately small collaborator of the todos slice. It owns the
//! `{status, colors}` value that `selectors::TodoSelectors::filtered_todos`
//! reads; the todos slice itself never writes it.
//!
//! The state lives behind an `Arc` in the app state, so filter edits are
//! copy-on-write and selector caches can key on the pointer.

use crate::state::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use taskflow_core::SmallVec;
use taskflow_core::effect::Effect;
use taskflow_core::reducer::Reducer;

/// Which completion states the view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Show everything
    #[default]
    All,
    /// Show only uncompleted todos
    Active,
    /// Show only completed todos
    Completed,
}

impl StatusFilter {
    /// Whether a todo with the given completion flag passes this filter
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

/// Filter state read by the filtered-todos selectors
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiltersState {
    /// Completion filter
    pub status: StatusFilter,
    /// Accepted color tags; empty means "any color"
    pub colors: BTreeSet<Color>,
}

/// Direction of a color filter edit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorChange {
    /// Add the color to the accepted set
    Added,
    /// Remove the color from the accepted set
    Removed,
}

/// Actions for the filters slice
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FiltersAction {
    /// Switch the completion filter
    StatusChanged(StatusFilter),
    /// Add or remove one color from the accepted set
    ColorChanged {
        /// Color being added or removed
        color: Color,
        /// Whether it is added or removed
        change: ColorChange,
    },
}

/// Reducer for the filters slice; pure, no effects
#[derive(Clone, Copy, Debug, Default)]
pub struct FiltersReducer;

impl Reducer for FiltersReducer {
    type State = Arc<FiltersState>;
    type Action = FiltersAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FiltersAction::StatusChanged(status) => {
                if state.status != status {
                    Arc::make_mut(state).status = status;
                }
            },
            FiltersAction::ColorChanged { color, change } => match change {
                ColorChange::Added => {
                    if !state.colors.contains(&color) {
                        Arc::make_mut(state).colors.insert(color);
                    }
                },
                ColorChange::Removed => {
                    if state.colors.contains(&color) {
                        Arc::make_mut(state).colors.remove(&color);
                    }
                },
            },
        }

        SmallVec::new()
    }
}
