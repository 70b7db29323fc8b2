//! Modal renaming of the object under the cursor.
//!
//! A [`NamingSession`] is either idle or editing one object's name in a text
//! buffer. Saving turns the buffer into a [`LayoutCommand::Rename`], so the rename
//! goes through the same history path as every other edit.
//!
//! ```rust
//! use layout_editor_core::{
//!     Command, EditorStateManager, FacilityLayout, GridPosition, GridSize, LayoutCommand,
//!     NamingSession, ObjectKind,
//! };
//!
//! let layout = FacilityLayout::new("Hall", "", GridSize::new(3, 3)).unwrap();
//! let mut manager = EditorStateManager::with_layout(layout);
//! manager.execute(Command::Layout(LayoutCommand::Place { kind: ObjectKind::Seat })).unwrap();
//!
//! let mut naming = NamingSession::new();
//! assert!(naming.start_editing(manager.layout(), GridPosition::new(0, 0)));
//! naming.set_input("Window seat");
//! naming.commit(&mut manager).unwrap();
//!
//! assert_eq!(
//!     manager.layout().object_at(GridPosition::new(0, 0)).and_then(|o| o.name()),
//!     Some("Window seat")
//! );
//! assert!(!naming.is_editing());
//! ```

use crate::commands::{Command, CommandError, CommandResult, LayoutCommand};
use crate::grid::GridPosition;
use crate::layout::FacilityLayout;
use crate::state::EditorStateManager;

/// Naming state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamingState {
    /// No rename in progress.
    #[default]
    Idle,
    /// Editing the name of `object_id`.
    Editing {
        /// Object being renamed.
        object_id: String,
        /// Current input buffer.
        input: String,
    },
}

/// Rename workflow for seats and generic objects
#[derive(Debug, Clone, Default)]
pub struct NamingSession {
    state: NamingState,
}

impl NamingSession {
    /// Idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &NamingState {
        &self.state
    }

    /// Whether a rename is in progress.
    pub fn is_editing(&self) -> bool {
        matches!(self.state, NamingState::Editing { .. })
    }

    /// Id of the object being renamed.
    pub fn object_id(&self) -> Option<&str> {
        match &self.state {
            NamingState::Editing { object_id, .. } => Some(object_id),
            NamingState::Idle => None,
        }
    }

    /// Current input buffer (empty when idle).
    pub fn input(&self) -> &str {
        match &self.state {
            NamingState::Editing { input, .. } => input,
            NamingState::Idle => "",
        }
    }

    /// Begin renaming the object at `position`.
    ///
    /// Only seats and generic objects have names; for spaces or empty cells the
    /// session stays idle and `false` is returned.
    pub fn start_editing(&mut self, layout: &FacilityLayout, position: GridPosition) -> bool {
        let Some(object) = layout.object_at(position) else {
            return false;
        };
        let Some(name) = object.name() else {
            return false;
        };

        tracing::debug!(object_id = object.id(), "start naming");
        self.state = NamingState::Editing {
            object_id: object.id().to_string(),
            input: name.to_string(),
        };
        true
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if let NamingState::Editing { input, .. } = &mut self.state {
            *input = text.into();
        }
    }

    /// Append a character to the input buffer.
    pub fn insert_char(&mut self, ch: char) {
        if let NamingState::Editing { input, .. } = &mut self.state {
            input.push(ch);
        }
    }

    /// Remove the last character of the input buffer.
    pub fn backspace(&mut self) {
        if let NamingState::Editing { input, .. } = &mut self.state {
            input.pop();
        }
    }

    /// Finish editing.
    ///
    /// Returns the rename command when a name is pending and the trimmed input is
    /// non-empty; otherwise the edit is discarded. The session is idle afterwards
    /// either way.
    pub fn save_edit(&mut self) -> Option<Command> {
        match std::mem::take(&mut self.state) {
            NamingState::Editing { object_id, input } => {
                let name = input.trim();
                if name.is_empty() {
                    tracing::debug!(%object_id, "discarded empty name");
                    None
                } else {
                    Some(Command::Layout(LayoutCommand::Rename {
                        object_id,
                        name: name.to_string(),
                    }))
                }
            }
            NamingState::Idle => None,
        }
    }

    /// [`save_edit`](Self::save_edit) and execute the resulting rename through `manager`.
    ///
    /// Returns [`CommandResult::Unchanged`] when nothing was committed.
    pub fn commit(
        &mut self,
        manager: &mut EditorStateManager,
    ) -> Result<CommandResult, CommandError> {
        match self.save_edit() {
            Some(command) => manager.execute(command),
            None => Ok(CommandResult::Unchanged),
        }
    }

    /// Abandon the edit without committing.
    pub fn cancel_edit(&mut self) {
        self.state = NamingState::Idle;
    }

    /// Stored name of the object being renamed, or an empty string.
    pub fn current_object_name(&self, layout: &FacilityLayout) -> String {
        self.object_id()
            .and_then(|id| layout.object_by_id(id))
            .and_then(|object| object.name())
            .unwrap_or_default()
            .to_string()
    }
}
