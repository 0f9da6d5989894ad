mod debounce;
mod editor_state;
mod persistence;
mod session;

pub use debounce::{Debouncer, LIVE_UPDATE_DEBOUNCE};
pub use editor_state::{EditorState, LiveSelection};
pub use persistence::{PREFERENCES_KEY, Preferences};
pub use session::EditSession;
