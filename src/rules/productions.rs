//! Production definitions: rules as data
//!
//! A production pairs a list of conditions over the records with a list of
//! action templates. Both vocabularies are closed enums so matching and
//! execution are plain pattern matches.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{Dimension, Step};
use crate::memory::{ScreenKind, WmState};

/// Every production in the rule base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    PrepareWm,
    AttendFixation,
    EncodeFixation,
    AttendCue,
    EncodeCue,
    AttendStimulus,
    ProcessShape,
    DontProcessShape,
    ProcessLocation,
    DontProcessLocation,
    RetrieveRule,
    RetrievalFailure,
    CheckPass,
    CheckDetectProblem,
    DontCheck,
    Respond,
}

impl RuleId {
    pub const ALL: [RuleId; 16] = [
        RuleId::PrepareWm,
        RuleId::AttendFixation,
        RuleId::EncodeFixation,
        RuleId::AttendCue,
        RuleId::EncodeCue,
        RuleId::AttendStimulus,
        RuleId::ProcessShape,
        RuleId::DontProcessShape,
        RuleId::ProcessLocation,
        RuleId::DontProcessLocation,
        RuleId::RetrieveRule,
        RuleId::RetrievalFailure,
        RuleId::CheckPass,
        RuleId::CheckDetectProblem,
        RuleId::DontCheck,
        RuleId::Respond,
    ];

    /// The four encoding rules whose competition decides which dimension goes first
    pub const COMPETITIVE: [RuleId; 4] = [
        RuleId::ProcessShape,
        RuleId::DontProcessShape,
        RuleId::ProcessLocation,
        RuleId::DontProcessLocation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleId::PrepareWm => "prepare-wm",
            RuleId::AttendFixation => "attend-fixation",
            RuleId::EncodeFixation => "encode-fixation",
            RuleId::AttendCue => "attend-cue",
            RuleId::EncodeCue => "encode-cue",
            RuleId::AttendStimulus => "attend-stimulus",
            RuleId::ProcessShape => "process-shape",
            RuleId::DontProcessShape => "dont-process-shape",
            RuleId::ProcessLocation => "process-location",
            RuleId::DontProcessLocation => "dont-process-location",
            RuleId::RetrieveRule => "retrieve-rule",
            RuleId::RetrievalFailure => "retrieval-failure",
            RuleId::CheckPass => "check-pass",
            RuleId::CheckDetectProblem => "check-detect-problem",
            RuleId::DontCheck => "dont-check",
            RuleId::Respond => "respond",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }

    /// Rules whose firing dispatches a reward
    pub fn is_reward_site(&self) -> bool {
        matches!(
            self,
            RuleId::CheckPass | RuleId::CheckDetectProblem | RuleId::RetrievalFailure | RuleId::Respond
        )
    }

    pub fn is_competitive(&self) -> bool {
        Self::COMPETITIVE.contains(self)
    }

    /// Rules that verify the retrieved rule
    pub fn is_check(&self) -> bool {
        matches!(self, RuleId::CheckPass | RuleId::CheckDetectProblem)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Records a condition can inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Record {
    Visual,
    WorkingMemory,
    Retrieval,
    Goal,
    Motor,
}

/// Closed set of predicates over the records and the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Goal step equals
    Step(Step),
    /// The screen currently shows this kind of display
    Screen(ScreenKind),
    /// The percept was taken from this kind of display
    Attended(ScreenKind),
    /// No percept, or one taken from a different display
    NotAttended(ScreenKind),
    Free(Record),
    Empty(Record),
    Full(Record),
    /// Last request on the record failed
    Failed(Record),
    /// Working memory holds an encoding of the dimension
    Holds(Dimension),
    /// Working memory holds no encoding of the dimension
    Lacks(Dimension),
    /// value1 or value2 is empty
    OpenSlot,
    WmState(WmState),
    Checked,
    /// The motivation policy allows verification
    CheckEligible,
    CheckIneligible,
    /// Retrieved rule's shape equals the percept's shape
    ShapeMatchesPercept,
    /// Retrieved rule's shape differs from the percept's shape
    ShapeDiffersFromPercept,
    HasMotorResponse,
}

/// Action templates, bound to concrete effects when the rule is selected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SetStep(Step),
    RequestAttend,
    RequestWorkingMemory,
    /// Write the percept's feature of this dimension into the open slot
    Encode(Dimension),
    /// Keep the cue side in value3 when the motivation model tracks cues
    EncodeCue,
    /// Ask declarative memory for the rule matching the encoded shape
    RequestRetrieval,
    ConsumeMotivation,
    SetWmState(WmState),
    MarkChecked,
    /// Cancel any outstanding retrieval and empty the record
    InvalidateRetrieval,
    /// Clear the working-memory fields the motivation model resets on a mismatch
    ResetAfterMismatch,
    RequestMotor,
    /// Retire retrieval, working memory and goal
    ClearTrial,
}

impl Action {
    /// The record this action requests, if any
    pub fn requested_record(&self) -> Option<Record> {
        match self {
            Action::RequestAttend => Some(Record::Visual),
            Action::RequestWorkingMemory => Some(Record::WorkingMemory),
            Action::RequestRetrieval => Some(Record::Retrieval),
            Action::RequestMotor => Some(Record::Motor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Production {
    pub id: RuleId,
    pub conditions: &'static [Condition],
    pub actions: &'static [Action],
}

impl Production {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}
