use serde::{Deserialize, Serialize};
use spelldrill_domain::{InputMethod, InputMode};

/// Say-Spell-Say phases: say the word, spell it, say it again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Initial,
    Spelling,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    /// Matched; listen again for the next phase.
    Continue(Phase),
    /// The last phase matched; the word is correct.
    Complete,
    Miss,
}

impl Phase {
    pub fn on_input(self, matched: bool) -> PhaseStep {
        match (self, matched) {
            (_, false) => PhaseStep::Miss,
            (Phase::Initial, true) => PhaseStep::Continue(Phase::Spelling),
            (Phase::Spelling, true) => PhaseStep::Continue(Phase::Final),
            (Phase::Final, true) => PhaseStep::Complete,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Phase::Initial => "Say the word",
            Phase::Spelling => "Spell the word aloud",
            Phase::Final => "Say the word again",
        }
    }
}

/// How the current word collects its answer. Only Say-Spell-Say carries a
/// phase, so a typed task cannot receive a phase event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputProtocol {
    Typed,
    Spoken,
    SaySpellSay(Phase),
}

impl InputProtocol {
    pub fn for_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::TypeOnly => InputProtocol::Typed,
            InputMode::SpellOnly => InputProtocol::Spoken,
            InputMode::SaySpellSay => InputProtocol::SaySpellSay(Phase::Initial),
        }
    }

    /// Same protocol, back at its first phase.
    pub fn fresh(self) -> Self {
        match self {
            InputProtocol::SaySpellSay(_) => InputProtocol::SaySpellSay(Phase::Initial),
            other => other,
        }
    }

    pub fn phase(self) -> Option<Phase> {
        match self {
            InputProtocol::SaySpellSay(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn method(self) -> InputMethod {
        match self {
            InputProtocol::Typed => InputMethod::Typing,
            InputProtocol::Spoken | InputProtocol::SaySpellSay(_) => InputMethod::Voice,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            InputProtocol::Typed => "Listen and type the word",
            InputProtocol::Spoken => "Spell the word aloud",
            InputProtocol::SaySpellSay(phase) => phase.instruction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        assert_eq!(Phase::Initial.on_input(true), PhaseStep::Continue(Phase::Spelling));
        assert_eq!(Phase::Spelling.on_input(true), PhaseStep::Continue(Phase::Final));
        assert_eq!(Phase::Final.on_input(true), PhaseStep::Complete);
        for phase in [Phase::Initial, Phase::Spelling, Phase::Final] {
            assert_eq!(phase.on_input(false), PhaseStep::Miss);
        }
    }

    #[test]
    fn protocols_follow_task_mode() {
        assert_eq!(InputProtocol::for_mode(InputMode::TypeOnly).phase(), None);
        assert_eq!(
            InputProtocol::for_mode(InputMode::SaySpellSay).phase(),
            Some(Phase::Initial)
        );
        assert_eq!(
            InputProtocol::SaySpellSay(Phase::Final).fresh(),
            InputProtocol::SaySpellSay(Phase::Initial)
        );
        assert_eq!(InputProtocol::Typed.method(), InputMethod::Typing);
        assert_eq!(InputProtocol::Spoken.method(), InputMethod::Voice);
    }
}
