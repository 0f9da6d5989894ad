use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_CAPACITY, clamp_capacity};

/// Storage key for the persisted preferences
pub const PREFERENCES_KEY: &str = "bg_eraser_preferences";

/// The only state that survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    /// Number of undo steps kept, 5..=100
    pub history_capacity: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Preferences {
    /// Read preferences from app storage, falling back to defaults.
    /// Out-of-range values are clamped.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let loaded = storage.and_then(|s| eframe::get_value::<Preferences>(s, PREFERENCES_KEY));
        match loaded {
            Some(prefs) => {
                log::debug!("Restored preferences: {:?}", prefs);
                prefs.clamped()
            }
            None => Self::default(),
        }
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFERENCES_KEY, self);
    }

    pub fn clamped(self) -> Self {
        Self {
            history_capacity: clamp_capacity(self.history_capacity),
        }
    }
}
