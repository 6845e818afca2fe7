//! The Simon-task rule base

use crate::core::types::{Dimension, Step};
use crate::memory::{ScreenKind, WmState};
use crate::rules::productions::{Action, Condition, Production, Record, RuleId};

use Condition as C;

const ENCODING_STAGE: [Condition; 3] = [
    C::Step(Step::AttendStimulus),
    C::Attended(ScreenKind::Stimulus),
    C::Full(Record::WorkingMemory),
];

const VERIFY_STAGE: [Condition; 3] = [
    C::Step(Step::RetrieveRule),
    C::Full(Record::Retrieval),
    C::WmState(WmState::Processing),
];

/// All productions, in declaration order
pub static RULE_BASE: &[Production] = &[
    Production {
        id: RuleId::PrepareWm,
        conditions: &[
            C::Step(Step::AttendFixation),
            C::Empty(Record::WorkingMemory),
            C::Free(Record::WorkingMemory),
        ],
        actions: &[Action::RequestWorkingMemory],
    },
    Production {
        id: RuleId::AttendFixation,
        conditions: &[
            C::Step(Step::AttendFixation),
            C::Screen(ScreenKind::Fixation),
            C::Free(Record::Visual),
            C::NotAttended(ScreenKind::Fixation),
        ],
        actions: &[Action::RequestAttend],
    },
    Production {
        id: RuleId::EncodeFixation,
        conditions: &[
            C::Step(Step::AttendFixation),
            C::Attended(ScreenKind::Fixation),
            C::Full(Record::WorkingMemory),
        ],
        actions: &[Action::SetStep(Step::AttendCue)],
    },
    Production {
        id: RuleId::AttendCue,
        conditions: &[
            C::Step(Step::AttendCue),
            C::Screen(ScreenKind::Cue),
            C::Free(Record::Visual),
            C::NotAttended(ScreenKind::Cue),
        ],
        actions: &[Action::RequestAttend],
    },
    Production {
        id: RuleId::EncodeCue,
        conditions: &[
            C::Step(Step::AttendCue),
            C::Attended(ScreenKind::Cue),
            C::Full(Record::WorkingMemory),
        ],
        actions: &[Action::EncodeCue, Action::SetStep(Step::AttendStimulus)],
    },
    Production {
        id: RuleId::AttendStimulus,
        conditions: &[
            C::Step(Step::AttendStimulus),
            C::Screen(ScreenKind::Stimulus),
            C::Free(Record::Visual),
            C::NotAttended(ScreenKind::Stimulus),
        ],
        actions: &[Action::RequestAttend],
    },
    Production {
        id: RuleId::ProcessShape,
        conditions: &[
            ENCODING_STAGE[0],
            ENCODING_STAGE[1],
            ENCODING_STAGE[2],
            C::Lacks(Dimension::Shape),
            C::OpenSlot,
        ],
        actions: &[Action::Encode(Dimension::Shape)],
    },
    // Holding shape back lets location take the first slot
    Production {
        id: RuleId::DontProcessShape,
        conditions: &[
            ENCODING_STAGE[0],
            ENCODING_STAGE[1],
            ENCODING_STAGE[2],
            C::Lacks(Dimension::Shape),
            C::Lacks(Dimension::Location),
            C::OpenSlot,
        ],
        actions: &[Action::Encode(Dimension::Location)],
    },
    Production {
        id: RuleId::ProcessLocation,
        conditions: &[
            ENCODING_STAGE[0],
            ENCODING_STAGE[1],
            ENCODING_STAGE[2],
            C::Lacks(Dimension::Location),
            C::OpenSlot,
        ],
        actions: &[Action::Encode(Dimension::Location)],
    },
    Production {
        id: RuleId::DontProcessLocation,
        conditions: &[
            ENCODING_STAGE[0],
            ENCODING_STAGE[1],
            ENCODING_STAGE[2],
            C::Lacks(Dimension::Location),
            C::Lacks(Dimension::Shape),
            C::OpenSlot,
        ],
        actions: &[Action::Encode(Dimension::Shape)],
    },
    Production {
        id: RuleId::RetrieveRule,
        conditions: &[
            ENCODING_STAGE[0],
            ENCODING_STAGE[1],
            ENCODING_STAGE[2],
            C::Holds(Dimension::Shape),
            C::Holds(Dimension::Location),
            C::Free(Record::Retrieval),
        ],
        actions: &[
            Action::RequestRetrieval,
            Action::ConsumeMotivation,
            Action::SetWmState(WmState::Processing),
            Action::SetStep(Step::RetrieveRule),
        ],
    },
    Production {
        id: RuleId::RetrievalFailure,
        conditions: &[
            C::Step(Step::RetrieveRule),
            C::Failed(Record::Retrieval),
            C::Free(Record::Retrieval),
        ],
        actions: &[Action::RequestRetrieval],
    },
    Production {
        id: RuleId::CheckPass,
        conditions: &[
            VERIFY_STAGE[0],
            VERIFY_STAGE[1],
            VERIFY_STAGE[2],
            C::CheckEligible,
            C::ShapeMatchesPercept,
        ],
        actions: &[Action::MarkChecked, Action::SetStep(Step::CheckRule)],
    },
    Production {
        id: RuleId::CheckDetectProblem,
        conditions: &[
            VERIFY_STAGE[0],
            VERIFY_STAGE[1],
            VERIFY_STAGE[2],
            C::CheckEligible,
            C::ShapeDiffersFromPercept,
        ],
        actions: &[
            Action::InvalidateRetrieval,
            Action::ResetAfterMismatch,
            Action::SetWmState(WmState::Idle),
            Action::SetStep(Step::AttendStimulus),
        ],
    },
    Production {
        id: RuleId::DontCheck,
        conditions: &[
            VERIFY_STAGE[0],
            VERIFY_STAGE[1],
            VERIFY_STAGE[2],
            C::CheckIneligible,
        ],
        actions: &[Action::MarkChecked, Action::SetStep(Step::CheckRule)],
    },
    Production {
        id: RuleId::Respond,
        conditions: &[
            C::Step(Step::CheckRule),
            C::Checked,
            C::WmState(WmState::Processing),
            C::Full(Record::Retrieval),
            C::HasMotorResponse,
            C::Free(Record::Motor),
        ],
        actions: &[
            Action::RequestMotor,
            Action::SetStep(Step::Done),
            Action::ClearTrial,
        ],
    },
];

pub fn get_production(id: RuleId) -> Option<&'static Production> {
    RULE_BASE.iter().find(|p| p.id == id)
}
