//! Error types for reaction registration, reduction and dispatch.

use crate::Path;
use thiserror::Error;

/// Result type alias for reaction-state operations.
pub type ReactionResult<T> = Result<T, ReactionError>;

/// Errors that can occur while registering reactions or reducing state.
#[derive(Debug, Error)]
pub enum ReactionError {
    /// A reaction was registered without an action constructor.
    #[error("missing action constructor in reaction {reaction}")]
    MissingAction {
        /// Qualified name of the offending reaction.
        reaction: String,
    },

    /// A slice effect carries none of set, append, insert, assign or delete.
    #[error(
        "missing set, append, insert, assign or delete on slice {slice} for reaction {reaction}"
    )]
    MissingEffect {
        /// Qualified name of the offending reaction.
        reaction: String,
        /// The slice the effect was declared on.
        slice: String,
    },

    /// A slice effect was declared on an empty slice.
    #[error("empty slice in reaction {reaction}")]
    EmptySlice {
        /// Qualified name of the offending reaction.
        reaction: String,
    },

    /// An action type or group already has a different substitution map.
    #[error("substitution map for {name} is already registered")]
    SubstitutionConflict {
        /// Action type or group name.
        name: String,
    },

    /// Append effect applied to a value that is not an array.
    #[error("append requires array value at {path}")]
    AppendRequiresArray {
        /// Where the effect ran.
        path: Path,
    },

    /// Assign effect applied to (or returning) a value that is not an object.
    #[error("assign requires object value at {path}")]
    AssignRequiresObject {
        /// Where the effect ran.
        path: Path,
    },

    /// Type mismatch when applying an effect.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Where the effect ran.
        path: Path,
        /// The expected type.
        expected: &'static str,
        /// The actual type found.
        found: &'static str,
    },

    /// Insert position is past the end of the array.
    #[error("index {index} out of bounds (len: {len}) at path {path}")]
    IndexOutOfBounds {
        /// Where the effect ran.
        path: Path,
        /// The requested index.
        index: usize,
        /// The array length.
        len: usize,
    },

    /// No action creator or thunk with this name is bound.
    #[error("unknown action: {name}")]
    UnknownAction {
        /// The requested name.
        name: String,
    },

    /// No group with this name is registered.
    #[error("unknown group: {group}")]
    UnknownGroup {
        /// The requested group.
        group: String,
    },

    /// Replay index past the end of the store history.
    #[error("invalid replay index: {index}, history length: {len}")]
    InvalidReplayIndex {
        /// The requested index.
        index: usize,
        /// The history length.
        len: usize,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReactionError {
    /// Create a missing action constructor error.
    #[inline]
    pub fn missing_action(reaction: impl Into<String>) -> Self {
        ReactionError::MissingAction {
            reaction: reaction.into(),
        }
    }

    /// Create a missing effect error.
    #[inline]
    pub fn missing_effect(reaction: impl Into<String>, slice: impl Into<String>) -> Self {
        ReactionError::MissingEffect {
            reaction: reaction.into(),
            slice: slice.into(),
        }
    }

    /// Create an empty slice error.
    #[inline]
    pub fn empty_slice(reaction: impl Into<String>) -> Self {
        ReactionError::EmptySlice {
            reaction: reaction.into(),
        }
    }

    /// Create a substitution conflict error.
    #[inline]
    pub fn substitution_conflict(name: impl Into<String>) -> Self {
        ReactionError::SubstitutionConflict { name: name.into() }
    }

    /// Create an append requires array error.
    #[inline]
    pub fn append_requires_array(path: Path) -> Self {
        ReactionError::AppendRequiresArray { path }
    }

    /// Create an assign requires object error.
    #[inline]
    pub fn assign_requires_object(path: Path) -> Self {
        ReactionError::AssignRequiresObject { path }
    }

    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        ReactionError::TypeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: usize, len: usize) -> Self {
        ReactionError::IndexOutOfBounds { path, index, len }
    }

    /// Create an unknown action error.
    #[inline]
    pub fn unknown_action(name: impl Into<String>) -> Self {
        ReactionError::UnknownAction { name: name.into() }
    }

    /// Create an unknown group error.
    #[inline]
    pub fn unknown_group(group: impl Into<String>) -> Self {
        ReactionError::UnknownGroup {
            group: group.into(),
        }
    }

    /// Returns true for errors raised while registering reactions.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReactionError::MissingAction { .. }
                | ReactionError::MissingEffect { .. }
                | ReactionError::EmptySlice { .. }
                | ReactionError::SubstitutionConflict { .. }
        )
    }
}
