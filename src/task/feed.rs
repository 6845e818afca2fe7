//! Screen sequence for one Simon trial

use crate::core::types::Step;
use crate::memory::Screen;
use crate::simulation::ScreenFeed;
use crate::task::stimulus::SimonStimulus;

/// Fixation, then cue, then stimulus, each shown once per trial
#[derive(Debug, Clone)]
pub struct StimulusFeed {
    stimulus: SimonStimulus,
    cue_shown: bool,
    stimulus_shown: bool,
}

impl StimulusFeed {
    pub fn new(stimulus: SimonStimulus) -> Self {
        Self {
            stimulus,
            cue_shown: false,
            stimulus_shown: false,
        }
    }
}

impl ScreenFeed for StimulusFeed {
    fn on_trial_start(&mut self) -> Option<Screen> {
        self.cue_shown = false;
        self.stimulus_shown = false;
        Some(Screen::Fixation)
    }

    fn on_step(&mut self, step: Step) -> Option<Screen> {
        match step {
            Step::AttendCue if !self.cue_shown => {
                self.cue_shown = true;
                Some(Screen::Cue(self.stimulus.cue))
            }
            // Corrections return to this step; the stimulus stays up
            Step::AttendStimulus if !self.stimulus_shown => {
                self.stimulus_shown = true;
                Some(Screen::Stimulus {
                    shape: self.stimulus.shape,
                    location: self.stimulus.location,
                })
            }
            _ => None,
        }
    }
}
