//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated time in seconds
pub type SimTime = f64;

/// Stimulus shape (the task-relevant dimension)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Circle, Shape::Square];

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
        }
    }
}

/// Horizontal screen position (the task-irrelevant dimension)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Left,
    Right,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Left, Location::Right];

    pub fn name(&self) -> &'static str {
        match self {
            Location::Left => "left",
            Location::Right => "right",
        }
    }

    /// The hand on the same side of the body
    pub fn hand(&self) -> Hand {
        match self {
            Location::Left => Hand::Left,
            Location::Right => Hand::Right,
        }
    }
}

/// Responding hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn name(&self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }

    /// Keyboard key pressed by the index finger of this hand
    pub fn key(&self) -> char {
        match self {
            Hand::Left => 'f',
            Hand::Right => 'j',
        }
    }

    /// Screen side that shares this hand's side
    pub fn location(&self) -> Location {
        match self {
            Hand::Left => Location::Left,
            Hand::Right => Location::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinkie,
    Thumb,
}

/// Stimulus dimension a rule is defined over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Shape,
    Location,
}

/// Control-flow phase held in the goal record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    AttendFixation,
    AttendCue,
    AttendStimulus,
    RetrieveRule,
    CheckRule,
    Done,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::AttendFixation => "attend-fixation",
            Step::AttendCue => "attend-cue",
            Step::AttendStimulus => "attend-stimulus",
            Step::RetrieveRule => "retrieve-rule",
            Step::CheckRule => "check-rule",
            Step::Done => "done",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_maps_to_same_side_hand() {
        for location in Location::ALL {
            assert_eq!(location.hand().location(), location);
        }
    }

    #[test]
    fn test_response_keys() {
        assert_eq!(Hand::Left.key(), 'f');
        assert_eq!(Hand::Right.key(), 'j');
    }

    #[test]
    fn test_step_names_are_kebab_case() {
        let json = serde_json::to_string(&Step::AttendFixation).unwrap();
        assert_eq!(json, "\"attend-fixation\"");
        assert_eq!(Step::RetrieveRule.to_string(), "retrieve-rule");
    }
}
