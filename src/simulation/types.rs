//! Core types for the intersection
//!
//! These are standalone types that don't depend on Bevy.

use std::fmt;

/// Default time a green phase is held before the next transition
pub const DEFAULT_CYCLE_MS: u64 = 2500;

/// All-red clearance between clearing the current green and re-asserting all-red
pub const PAUSE_RED_MS: u64 = 150;

/// Short pause between the re-asserted all-red and the next green
pub const MICRO_PAUSE_MS: u64 = 60;

/// One of the four roads feeding the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approach {
    North,
    East,
    South,
    West,
}

impl Approach {
    /// Clockwise rotation order. Index 0 is the approach that is green at start.
    pub const ROTATION: [Approach; 4] = [
        Approach::North,
        Approach::East,
        Approach::South,
        Approach::West,
    ];

    /// Approach at a rotation cursor (wraps around)
    pub fn at(cursor: usize) -> Self {
        Self::ROTATION[cursor % Self::ROTATION.len()]
    }

    /// Position of this approach in the rotation order
    pub fn index(self) -> usize {
        match self {
            Approach::North => 0,
            Approach::East => 1,
            Approach::South => 2,
            Approach::West => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Approach::North => "north",
            Approach::East => "east",
            Approach::South => "south",
            Approach::West => "west",
        }
    }

    /// Clockwise rotation applied to the signal head when it is drawn
    pub fn rotation_degrees(self) -> f32 {
        match self {
            Approach::North => 0.0,
            Approach::East => 90.0,
            Approach::South => 180.0,
            Approach::West => -90.0,
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two lamps a signal head can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    #[default]
    Red,
    Green,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::Red => "red",
            Signal::Green => "green",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signal shown by every approach, indexed by rotation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightState {
    signals: [Signal; 4],
}

impl LightState {
    /// Start state: north green, everything else red
    pub fn initial() -> Self {
        Self::with_green(Approach::North)
    }

    pub fn all_red() -> Self {
        Self {
            signals: [Signal::Red; 4],
        }
    }

    /// Exactly one approach green
    pub fn with_green(approach: Approach) -> Self {
        let mut state = Self::all_red();
        state.set(approach, Signal::Green);
        state
    }

    pub fn get(&self, approach: Approach) -> Signal {
        self.signals[approach.index()]
    }

    pub fn set(&mut self, approach: Approach, signal: Signal) {
        self.signals[approach.index()] = signal;
    }

    /// Iterate approaches in rotation order with their current signal
    pub fn iter(&self) -> impl Iterator<Item = (Approach, Signal)> + '_ {
        Approach::ROTATION
            .iter()
            .map(move |&approach| (approach, self.get(approach)))
    }

    pub fn green_count(&self) -> usize {
        self.signals.iter().filter(|s| **s == Signal::Green).count()
    }

    /// The single green approach, if the state is steady
    pub fn green_approach(&self) -> Option<Approach> {
        let mut greens = self.iter().filter(|(_, s)| *s == Signal::Green);
        match (greens.next(), greens.next()) {
            (Some((approach, _)), None) => Some(approach),
            _ => None,
        }
    }

    pub fn is_all_red(&self) -> bool {
        self.green_count() == 0
    }

    /// Label for one lamp of one signal head, e.g. `east-green`
    pub fn lamp_label(approach: Approach, lamp: Signal) -> String {
        format!("{}-{}", approach, lamp)
    }

    /// Labels of the lamps that are currently lit, in rotation order
    pub fn lit_labels(&self) -> Vec<String> {
        self.iter()
            .map(|(approach, signal)| Self::lamp_label(approach, signal))
            .collect()
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(approach, signal)| format!("{}={}", approach, signal))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_clockwise() {
        assert_eq!(Approach::at(0), Approach::North);
        assert_eq!(Approach::at(3), Approach::West);
        assert_eq!(Approach::at(4), Approach::North);
        for approach in Approach::ROTATION {
            assert_eq!(Approach::at(approach.index()), approach);
        }
    }

    #[test]
    fn initial_state_has_north_green() {
        let state = LightState::initial();
        assert_eq!(state.green_approach(), Some(Approach::North));
        assert_eq!(state.green_count(), 1);
        assert_eq!(state.get(Approach::South), Signal::Red);
    }

    #[test]
    fn green_approach_is_none_when_not_steady() {
        assert_eq!(LightState::all_red().green_approach(), None);

        let mut state = LightState::initial();
        state.set(Approach::West, Signal::Green);
        assert_eq!(state.green_approach(), None);
        assert_eq!(state.green_count(), 2);
    }

    #[test]
    fn labels_follow_approach_and_lamp() {
        assert_eq!(LightState::lamp_label(Approach::East, Signal::Green), "east-green");
        assert_eq!(
            LightState::initial().lit_labels(),
            vec!["north-green", "east-red", "south-red", "west-red"]
        );
    }

    #[test]
    fn rotation_offsets() {
        assert_eq!(Approach::North.rotation_degrees(), 0.0);
        assert_eq!(Approach::East.rotation_degrees(), 90.0);
        assert_eq!(Approach::South.rotation_degrees(), 180.0);
        assert_eq!(Approach::West.rotation_degrees(), -90.0);
    }
}
