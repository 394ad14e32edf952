//! Editor-facing state.
//!
//! Viewport transforms between screen and page space, the selection
//! manager, and the editor session whose drag lifecycle funnels pointer
//! gestures into single undoable update actions.

pub mod selection;
pub mod session;
pub mod viewport;

pub use selection::{hit_test, Selection};
pub use session::{EditorSession, Tool};
pub use viewport::{PagePoint, Viewport};
