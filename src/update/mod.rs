//! Update functions for the Elm-style architecture
//!
//! All table state transformations flow through these functions.

mod table;

pub use table::update_table;

use crate::commands::Cmd;
use crate::messages::TableMsg;
use crate::table::{InputAdapter, TableState, TableWidget};

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function for one table widget
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(
    widget: &TableWidget,
    state: &mut TableState,
    input: &mut dyn InputAdapter,
    msg: TableMsg,
) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(widget, state, input, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        table::update_table(widget, state, input, msg)
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after selection state and logs diffs for debugging.
/// Pointer moves are not logged.
#[cfg(debug_assertions)]
fn update_traced(
    widget: &TableWidget,
    state: &mut TableState,
    input: &mut dyn InputAdapter,
    msg: TableMsg,
) -> Option<Cmd> {
    let is_noisy = matches!(&msg, TableMsg::PointerMove { .. });

    let msg_name = format!("Table::{:?}", msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", table = widget.index, msg = %msg_name).entered())
    };

    let before = SelectionSnapshot::from_state(state);
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = table::update_table(widget, state, input, msg);

    if let Some(diff) = before.diff(&SelectionSnapshot::from_state(state)) {
        debug!(target: "selection", %diff, "state changed");
    }

    if let Some(selection) = state.selection {
        debug_assert_eq!(
            selection,
            selection.clamped(widget.data.row_count(), widget.data.column_count()),
            "selection out of bounds after {}",
            msg_name
        );
    }

    result
}
