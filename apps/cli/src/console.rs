use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::debug;

use spelldrill_domain::Word;
use spelldrill_speech::{
    FeedbackCue, RecognitionError, Speaker, SpeechError, SpeechOptions, SpeechRecognizer,
};
use spelldrill_tutor::{
    LearnerAction, Outcome, PracticeObserver, Prompt, RevealFrame, TypedInput,
};

pub const QUIT_COMMAND: &str = ":q";
pub const REPEAT_COMMAND: &str = ":r";

type LineReader = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Line-oriented input shared by the typed prompt and the console "microphone".
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<LineReader>>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let boxed: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(boxed.lines())),
        }
    }

    async fn next_line(&self) -> io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

#[async_trait]
impl TypedInput for ConsoleInput {
    async fn next_action(&mut self, _prompt: &Prompt) -> LearnerAction {
        match self.next_line().await {
            Ok(Some(line)) if line.trim() == QUIT_COMMAND => LearnerAction::Leave,
            Ok(Some(line)) if line.trim() == REPEAT_COMMAND => LearnerAction::RepeatWord,
            Ok(Some(line)) => LearnerAction::Answer(line),
            Ok(None) => LearnerAction::Leave,
            Err(err) => {
                debug!(%err, "stdin closed");
                LearnerAction::Leave
            }
        }
    }
}

/// Treats each input line as one recognized utterance.
pub struct ConsoleRecognizer {
    input: ConsoleInput,
}

impl ConsoleRecognizer {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl SpeechRecognizer for ConsoleRecognizer {
    async fn listen(&self) -> Result<String, RecognitionError> {
        match self.input.next_line().await {
            Ok(Some(line)) if line.trim() == QUIT_COMMAND => Err(RecognitionError::Cancelled),
            Ok(Some(line)) if line.trim().is_empty() => Err(RecognitionError::NoSpeech),
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(RecognitionError::Cancelled),
            Err(err) => Err(RecognitionError::classify(&err.to_string())),
        }
    }

    async fn stop(&self) {}
}

/// Prints what a synthesizer would say.
pub struct ConsoleSpeaker;

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<(), SpeechError> {
        debug!(text, rate = options.rate, voice = ?options.voice, "speak");
        println!("  (says) \"{text}\"");
        Ok(())
    }

    async fn stop(&self) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Terminal bell.
pub struct BellCue;

#[async_trait]
impl FeedbackCue for BellCue {
    async fn play(&self) -> Result<(), SpeechError> {
        print!("\x07");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleObserver {
    correct: u32,
    total: u32,
}

impl PracticeObserver for ConsoleObserver {
    fn word_started(&mut self, _word: &Word, position: usize, total: usize) {
        println!();
        println!("Word {} of {}", position + 1, total);
    }

    fn prompt(&mut self, prompt: &Prompt) {
        let attempt = if prompt.max_attempts > 1 && !prompt.must_repeat {
            format!(" (attempt {}/{})", prompt.attempt, prompt.max_attempts)
        } else {
            String::new()
        };
        println!("{}{attempt}  [{REPEAT_COMMAND} repeat, {QUIT_COMMAND} quit]", prompt.instruction);
    }

    fn outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Correct | Outcome::Repeated => println!("Correct!"),
            Outcome::Retry { .. } => println!("Not quite, listen again."),
            Outcome::Missed => println!("Not quite."),
            Outcome::RepeatMismatch => println!("Try once more."),
            Outcome::PhaseMatched(phase) => println!("Good! {}", phase.instruction()),
            _ => {}
        }
    }

    fn letter_revealed(&mut self, frame: &RevealFrame) {
        println!("  {}", frame.revealed.to_uppercase());
    }

    fn notice(&mut self, message: &str) {
        println!("{message}");
    }

    fn alert(&mut self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }

    fn score(&mut self, correct: u32, total: u32) {
        if (correct, total) != (self.correct, self.total) {
            println!("Score: {correct}/{total}");
        }
        self.correct = correct;
        self.total = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spelldrill_tutor::InputChannel;

    fn prompt() -> Prompt {
        Prompt {
            channel: InputChannel::Typing,
            instruction: "Listen and type the word",
            position: 0,
            total: 1,
            attempt: 1,
            max_attempts: 3,
            must_repeat: false,
        }
    }

    #[tokio::test]
    async fn typed_commands_map_to_actions() {
        let mut input = ConsoleInput::from_reader(&b"cat\n:r\n:q\n"[..]);
        assert_eq!(
            input.next_action(&prompt()).await,
            LearnerAction::Answer("cat".into())
        );
        assert_eq!(input.next_action(&prompt()).await, LearnerAction::RepeatWord);
        assert_eq!(input.next_action(&prompt()).await, LearnerAction::Leave);
        assert_eq!(input.next_action(&prompt()).await, LearnerAction::Leave);
    }

    #[tokio::test]
    async fn blank_lines_are_no_speech() {
        let recognizer = ConsoleRecognizer::new(ConsoleInput::from_reader(&b"s u n\n\n:q\n"[..]));
        assert_eq!(recognizer.listen().await.unwrap(), "s u n");
        assert_eq!(recognizer.listen().await, Err(RecognitionError::NoSpeech));
        assert_eq!(recognizer.listen().await, Err(RecognitionError::Cancelled));
        assert_eq!(recognizer.listen().await, Err(RecognitionError::Cancelled));
    }
}
