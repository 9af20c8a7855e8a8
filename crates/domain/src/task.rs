use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::AssignmentId;

pub const PRACTICE_MAX_ATTEMPTS: u32 = 3;
pub const TEST_MAX_ATTEMPTS: u32 = 1;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Practice,
    Test,
}

impl TaskType {
    pub fn is_test(self) -> bool {
        matches!(self, TaskType::Test)
    }

    pub fn max_attempts(self) -> u32 {
        match self {
            TaskType::Practice => PRACTICE_MAX_ATTEMPTS,
            TaskType::Test => TEST_MAX_ATTEMPTS,
        }
    }
}

/// How a task collects answers.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    #[default]
    TypeOnly,
    SpellOnly,
    SaySpellSay,
}

impl InputMode {
    pub fn uses_voice(self) -> bool {
        !matches!(self, InputMode::TypeOnly)
    }

    pub fn label(self) -> &'static str {
        match self {
            InputMode::TypeOnly => "Type Only",
            InputMode::SpellOnly => "Spell Only",
            InputMode::SaySpellSay => "Say-Spell-Say",
        }
    }
}

/// An assignment of a word list to a student, as configured by a parent or educator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub assignment_id: AssignmentId,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub test_input_mode: InputMode,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

fn default_sound_enabled() -> bool {
    true
}

impl Task {
    pub fn new(assignment_id: impl Into<AssignmentId>, task_type: TaskType, mode: InputMode) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            task_type,
            test_input_mode: mode,
            sound_enabled: true,
            due_date: None,
        }
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    pub fn is_test(&self) -> bool {
        self.task_type.is_test()
    }

    pub fn max_attempts(&self) -> u32 {
        self.task_type.max_attempts()
    }

    pub fn voice_enabled(&self) -> bool {
        self.test_input_mode.uses_voice()
    }
}
