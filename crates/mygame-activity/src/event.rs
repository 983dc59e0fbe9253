use mygame_core::alloc::HashMap;

/// Memory pressure level reported by the host.
///
/// Raw values follow the host's trim-memory constants; anything unknown is
/// kept as [`TrimLevel::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimLevel {
    /// Running, memory is getting low.
    RunningModerate,
    /// Running, memory is low.
    RunningLow,
    /// Running, memory is critically low.
    RunningCritical,
    /// The UI went into the background.
    UiHidden,
    /// Backgrounded, near the start of the LRU list.
    Background,
    /// Backgrounded, around the middle of the LRU list.
    Moderate,
    /// Backgrounded, next to be killed.
    Complete,
    Other(i32),
}

impl TrimLevel {
    pub fn from_raw(level: i32) -> Self {
        match level {
            5 => TrimLevel::RunningModerate,
            10 => TrimLevel::RunningLow,
            15 => TrimLevel::RunningCritical,
            20 => TrimLevel::UiHidden,
            40 => TrimLevel::Background,
            60 => TrimLevel::Moderate,
            80 => TrimLevel::Complete,
            other => TrimLevel::Other(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            TrimLevel::RunningModerate => 5,
            TrimLevel::RunningLow => 10,
            TrimLevel::RunningCritical => 15,
            TrimLevel::UiHidden => 20,
            TrimLevel::Background => 40,
            TrimLevel::Moderate => 60,
            TrimLevel::Complete => 80,
            TrimLevel::Other(level) => level,
        }
    }

    /// Whether the process is still in the foreground.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            TrimLevel::RunningModerate | TrimLevel::RunningLow | TrimLevel::RunningCritical
        )
    }
}

/// State bundle the host hands back when an activity is recreated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    values: HashMap<String, String>,
}

impl SavedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_levels_map_both_ways() {
        for raw in [5, 10, 15, 20, 40, 60, 80] {
            assert_eq!(TrimLevel::from_raw(raw).raw(), raw);
        }
        assert_eq!(TrimLevel::from_raw(7), TrimLevel::Other(7));
        assert_eq!(TrimLevel::Other(7).raw(), 7);
    }

    #[test]
    fn running_levels() {
        assert!(TrimLevel::RunningLow.is_running());
        assert!(!TrimLevel::UiHidden.is_running());
        assert!(!TrimLevel::Other(10).is_running());
    }

    #[test]
    fn saved_state_lookup() {
        let mut state = SavedState::new();
        assert!(state.is_empty());
        state.insert("level", "3");
        assert_eq!(state.get("level"), Some("3"));
        assert_eq!(state.get("missing"), None);
        assert_eq!(state.len(), 1);
    }
}
