use thiserror::Error;

/// Errors reported by the map, the set, their views and cursors.
///
/// Every error is raised before anything is written, so a failed call never leaves a
/// container partially modified.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A lookup that requires the key found nothing.
    #[error("the given key was not present in the map")]
    KeyNotFound,

    /// An insert that must not overwrite met an equal key.
    #[error("an element with the same key already exists")]
    DuplicateKey,

    /// A [`Cursor`](crate::Cursor) was used outside the state that allows the call.
    #[error("cursor is in an invalid state: {0}")]
    InvalidState(CursorFault),

    /// A copy destination is too small for the elements past `offset`.
    #[error("destination of capacity {capacity} cannot hold {required} elements at offset {offset}")]
    Bounds {
        offset: usize,
        capacity: usize,
        required: usize,
    },

    /// A mutating call on a read-only view.
    #[error("`{operation}` is not supported on a read-only view")]
    Unsupported { operation: &'static str },
}

/// Why a cursor call was refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum CursorFault {
    #[error("enumeration has not started")]
    NotStarted,
    #[error("enumeration already finished")]
    Ended,
    #[error("collection was modified; enumeration operation may not execute")]
    Modified,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Checks that `required` elements fit into a destination of `capacity` slots from `offset` on.
pub(crate) fn check_bounds(offset: usize, capacity: usize, required: usize) -> Result<()> {
    match capacity.checked_sub(offset) {
        Some(room) if room >= required => Ok(()),
        _ => Err(Error::Bounds {
            offset,
            capacity,
            required,
        }),
    }
}
