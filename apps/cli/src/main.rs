mod config;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use spelldrill_domain::{InputMode, Task, TaskType};
use spelldrill_services::{HttpPracticeClient, MemoryTokenStore, OfflinePracticeApi, PracticeApi};
use spelldrill_speech::{
    resolve_voice, JsonPreferenceStore, Platform, SpeechDevices, SpeechOptions,
    VoicePreferenceStore,
};
use spelldrill_tutor::{local_accuracy, PracticeRunner, SessionEnd};

use crate::config::AppConfig;
use crate::console::{BellCue, ConsoleInput, ConsoleObserver, ConsoleRecognizer, ConsoleSpeaker};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TaskTypeArg {
    Practice,
    Test,
}

impl From<TaskTypeArg> for TaskType {
    fn from(arg: TaskTypeArg) -> Self {
        match arg {
            TaskTypeArg::Practice => TaskType::Practice,
            TaskTypeArg::Test => TaskType::Test,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputModeArg {
    TypeOnly,
    SpellOnly,
    SaySpellSay,
}

impl From<InputModeArg> for InputMode {
    fn from(arg: InputModeArg) -> Self {
        match arg {
            InputModeArg::TypeOnly => InputMode::TypeOnly,
            InputModeArg::SpellOnly => InputMode::SpellOnly,
            InputModeArg::SaySpellSay => InputMode::SaySpellSay,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Practice spelling words by typing or spelling aloud", long_about = None)]
struct Cli {
    /// YAML settings file; defaults to <config dir>/spelldrill/config.yaml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend base URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,
    /// Bearer token for the backend
    #[arg(long)]
    token: Option<String>,
    /// Serve the word list locally instead of calling the backend
    #[arg(long)]
    offline: bool,
    /// Comma-separated words for an offline session
    #[arg(long, value_delimiter = ',')]
    words: Vec<String>,
    #[arg(long, value_enum, default_value = "practice")]
    task_type: TaskTypeArg,
    #[arg(long, value_enum, default_value = "type-only")]
    input_mode: InputModeArg,
    /// Disable the feedback ding
    #[arg(long)]
    no_sound: bool,
    /// Task assignment to practice
    #[arg(long, default_value = "local")]
    assignment: String,
    /// Voice identifier to use and remember
    #[arg(long)]
    voice: Option<String>,
    /// Log filter, e.g. "info" or "spelldrill_tutor=debug"
    #[arg(long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }

    let task = Task::new(
        cli.assignment.as_str(),
        cli.task_type.into(),
        cli.input_mode.into(),
    )
    .with_sound(!cli.no_sound);
    let api = build_api(&cli, &config)?;
    let options = speech_options(&cli, &config);

    let input = ConsoleInput::stdin();
    let devices = SpeechDevices::acquire(
        Arc::new(ConsoleSpeaker),
        Arc::new(ConsoleRecognizer::new(input.clone())),
        Arc::new(BellCue),
        options,
    );
    println!(
        "{} {} ({})",
        if task.is_test() { "Test" } else { "Practice" },
        task.assignment_id,
        task.test_input_mode.label()
    );

    let end = PracticeRunner::new(api, devices, task)
        .with_typed_input(Box::new(input))
        .with_observer(Box::new(ConsoleObserver::default()))
        .with_timings(config.timings)
        .run()
        .await?;
    report(&end);
    Ok(())
}

fn build_api(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn PracticeApi>> {
    if cli.offline || !cli.words.is_empty() {
        let words: Vec<&str> = cli
            .words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            bail!("offline sessions need a word list, e.g. --words cat,dog,sun");
        }
        info!(words = words.len(), "using offline backend");
        return Ok(Arc::new(OfflinePracticeApi::from_texts(words)));
    }
    let token = cli.token.clone().or_else(|| config.token.clone());
    if token.is_none() {
        warn!("no token configured, requests will likely be rejected");
    }
    let tokens = Arc::new(MemoryTokenStore::new(token));
    info!(base_url = %config.api.base_url, "using backend");
    Ok(Arc::new(HttpPracticeClient::new(config.api.clone(), tokens)?))
}

fn speech_options(cli: &Cli, config: &AppConfig) -> SpeechOptions {
    let Some(store) = JsonPreferenceStore::default_location() else {
        return config.speech.clone();
    };
    if let Some(voice) = &cli.voice {
        if let Err(err) = store.set_selected_voice(voice) {
            warn!(%err, "could not save voice preference");
        }
    }
    if config.voices.is_empty() {
        let saved = cli.voice.clone().or_else(|| store.selected_voice().ok().flatten());
        return config.speech.clone().with_voice(saved.or(config.speech.voice.clone()));
    }
    let voice = resolve_voice(&store, &config.voices, Platform::Other);
    config.speech.clone().with_voice(voice)
}

fn report(end: &SessionEnd) {
    println!();
    match end {
        SessionEnd::Completed(report) => {
            let analytics = report.analytics();
            println!("{}", analytics.headline());
            println!(
                "Accuracy: {:.0}%  ({} of {} right first time, {} correct overall)",
                report.reported.accuracy_percentage,
                report.reported.correct_first_try,
                report.reported.total_words,
                report.reported.total_correct
            );
            if analytics.suggests_retry() {
                println!("Try this list again to master it.");
            }
        }
        SessionEnd::Abandoned { results } => {
            println!(
                "Session left early: {}/{} correct ({:.0}%).",
                results.correct,
                results.total,
                local_accuracy(results)
            );
        }
    }
}
