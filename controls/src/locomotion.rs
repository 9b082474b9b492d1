use std::fmt;

/// Discrete animation/movement mode of the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    Idle,
    Walk,
    Run,
}

impl LocomotionState {
    /// Pick the state for this frame from movement input and the run toggle.
    pub fn select(direction_pressed: bool, toggle_run: bool) -> Self {
        match (direction_pressed, toggle_run) {
            (true, true) => Self::Run,
            (true, false) => Self::Walk,
            (false, _) => Self::Idle,
        }
    }

    /// Name of the animation clip that plays in this state.
    pub fn clip_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Run => "Run",
        }
    }

    pub fn from_clip_name(name: &str) -> Option<Self> {
        match name {
            "Idle" => Some(Self::Idle),
            "Walk" => Some(Self::Walk),
            "Run" => Some(Self::Run),
            _ => None,
        }
    }

    pub fn is_moving(self) -> bool {
        matches!(self, Self::Walk | Self::Run)
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.clip_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_without_direction_regardless_of_toggle() {
        assert_eq!(LocomotionState::select(false, true), LocomotionState::Idle);
        assert_eq!(LocomotionState::select(false, false), LocomotionState::Idle);
    }

    #[test]
    fn toggle_picks_run_or_walk() {
        assert_eq!(LocomotionState::select(true, true), LocomotionState::Run);
        assert_eq!(LocomotionState::select(true, false), LocomotionState::Walk);
    }

    #[test]
    fn clip_names_map_back_to_states() {
        for state in [
            LocomotionState::Idle,
            LocomotionState::Walk,
            LocomotionState::Run,
        ] {
            assert_eq!(LocomotionState::from_clip_name(state.clip_name()), Some(state));
        }
        assert_eq!(LocomotionState::from_clip_name("TPose"), None);
    }
}
