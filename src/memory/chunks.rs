//! Contents of the working registers

use serde::{Deserialize, Serialize};

use crate::core::types::{Dimension, Finger, Hand, Location, Shape, SimTime, Step};

/// What the screen currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Blank,
    Fixation,
    Cue(Location),
    Stimulus { shape: Shape, location: Location },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenKind {
    Blank,
    Fixation,
    Cue,
    Stimulus,
    Done,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Blank => ScreenKind::Blank,
            Screen::Fixation => ScreenKind::Fixation,
            Screen::Cue(_) => ScreenKind::Cue,
            Screen::Stimulus { .. } => ScreenKind::Stimulus,
            Screen::Done => ScreenKind::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerceptKind {
    ScreenText,
    Cue,
    Stimulus,
}

/// The currently attended visual object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percept {
    pub kind: PerceptKind,
    pub source: ScreenKind,
    pub text: Option<&'static str>,
    pub shape: Option<Shape>,
    pub location: Option<Location>,
    pub cue: Option<Location>,
    pub color: &'static str,
}

impl Percept {
    /// Encode whatever is on screen; a blank screen yields nothing to attend
    pub fn from_screen(screen: Screen) -> Option<Self> {
        let base = Percept {
            kind: PerceptKind::ScreenText,
            source: screen.kind(),
            text: None,
            shape: None,
            location: None,
            cue: None,
            color: "black",
        };
        match screen {
            Screen::Blank => None,
            Screen::Fixation => Some(Percept { text: Some("+"), ..base }),
            Screen::Done => Some(Percept { text: Some("done"), ..base }),
            Screen::Cue(side) => Some(Percept {
                kind: PerceptKind::Cue,
                cue: Some(side),
                ..base
            }),
            Screen::Stimulus { shape, location } => Some(Percept {
                kind: PerceptKind::Stimulus,
                shape: Some(shape),
                location: Some(location),
                ..base
            }),
        }
    }
}

/// One encoded stimulus feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Shape(Shape),
    Location(Location),
}

impl Encoding {
    pub fn dimension(&self) -> Dimension {
        match self {
            Encoding::Shape(_) => Dimension::Shape,
            Encoding::Location(_) => Dimension::Location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WmField {
    Value1,
    Value2,
    Value3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WmState {
    Idle,
    Processing,
}

/// The agent's evolving interpretation of the trial
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkingMemoryNote {
    pub state: WmState,
    /// First encoded stimulus dimension
    pub value1: Option<Encoding>,
    /// The other dimension
    pub value2: Option<Encoding>,
    /// Cue side, kept only under the clock model
    pub value3: Option<Encoding>,
    pub checked: bool,
}

impl Default for WorkingMemoryNote {
    fn default() -> Self {
        Self {
            state: WmState::Idle,
            value1: None,
            value2: None,
            value3: None,
            checked: false,
        }
    }
}

impl WorkingMemoryNote {
    pub fn field(&self, field: WmField) -> Option<Encoding> {
        match field {
            WmField::Value1 => self.value1,
            WmField::Value2 => self.value2,
            WmField::Value3 => self.value3,
        }
    }

    pub fn set_field(&mut self, field: WmField, value: Option<Encoding>) {
        match field {
            WmField::Value1 => self.value1 = value,
            WmField::Value2 => self.value2 = value,
            WmField::Value3 => self.value3 = value,
        }
    }

    /// Whether a stimulus dimension sits in value1 or value2
    pub fn holds(&self, dimension: Dimension) -> bool {
        [self.value1, self.value2]
            .iter()
            .flatten()
            .any(|e| e.dimension() == dimension)
    }

    pub fn shape(&self) -> Option<Shape> {
        [self.value1, self.value2].into_iter().flatten().find_map(|e| match e {
            Encoding::Shape(s) => Some(s),
            _ => None,
        })
    }

    pub fn location(&self) -> Option<Location> {
        [self.value1, self.value2].into_iter().flatten().find_map(|e| match e {
            Encoding::Location(l) => Some(l),
            _ => None,
        })
    }

    /// First empty stimulus slot, value1 before value2
    pub fn open_slot(&self) -> Option<WmField> {
        if self.value1.is_none() {
            Some(WmField::Value1)
        } else if self.value2.is_none() {
            Some(WmField::Value2)
        } else {
            None
        }
    }

    /// Spreading-activation sources: every filled value
    pub fn sources(&self) -> Vec<Encoding> {
        [self.value1, self.value2, self.value3]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Static stimulus-response association held in declarative memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    pub shape: Shape,
    /// Responding hand; a rule without one cannot drive a key press
    #[serde(default)]
    pub hand: Option<Hand>,
    #[serde(default = "default_finger")]
    pub finger: Finger,
    #[serde(default = "default_dimension")]
    pub dimension: Dimension,
}

fn default_finger() -> Finger {
    Finger::Index
}

fn default_dimension() -> Dimension {
    Dimension::Shape
}

impl RuleDefinition {
    pub fn new(name: &str, shape: Shape, hand: Hand) -> Self {
        Self {
            name: name.to_string(),
            shape,
            hand: Some(hand),
            finger: Finger::Index,
            dimension: Dimension::Shape,
        }
    }

    /// A shape association with no response slot
    pub fn without_response(name: &str, shape: Shape) -> Self {
        Self {
            hand: None,
            ..Self::new(name, shape, Hand::Left)
        }
    }

    /// Circle responds left, square responds right
    pub fn simon_defaults() -> Vec<Self> {
        vec![
            Self::new("circle-left", Shape::Circle, Hand::Left),
            Self::new("square-right", Shape::Square, Hand::Right),
        ]
    }

    /// Whether an encoded feature appears among this rule's slot values
    pub fn mentions(&self, encoding: Encoding) -> bool {
        match encoding {
            Encoding::Shape(s) => self.shape == s,
            Encoding::Location(l) => self.hand == Some(l.hand()),
        }
    }
}

/// A rule as it landed in the retrieval record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedRule {
    pub name: String,
    pub shape: Shape,
    pub hand: Option<Hand>,
    pub finger: Finger,
    pub dimension: Dimension,
    pub activation: f64,
}

impl RetrievedRule {
    pub fn from_definition(def: &RuleDefinition, activation: f64) -> Self {
        Self {
            name: def.name.clone(),
            shape: def.shape,
            hand: def.hand,
            finger: def.finger,
            dimension: def.dimension,
            activation,
        }
    }

    pub fn has_motor_response(&self) -> bool {
        self.hand.is_some()
    }
}

/// Remaining motivation budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Motivation {
    /// Retrieval attempts left (count model)
    Retries(u32),
    /// Seconds after onset during which checking is allowed (clock model)
    Deadline(f64),
}

/// Control-flow phase plus motivation budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalState {
    pub step: Step,
    pub motivation: Motivation,
    pub time_onset: SimTime,
    /// Elapsed time at the most recent check decision
    pub time_duration: Option<SimTime>,
}

impl GoalState {
    pub fn new(motivation: Motivation, time_onset: SimTime) -> Self {
        Self {
            step: Step::AttendFixation,
            motivation,
            time_onset,
            time_duration: None,
        }
    }

    pub fn elapsed(&self, now: SimTime) -> SimTime {
        now - self.time_onset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorCommand {
    pub hand: Hand,
    pub finger: Finger,
}
