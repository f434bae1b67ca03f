//! Readline-backed console for the interactive chat loop.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use recallbot::agent::{AnswerSource, Console, Resolution};
use recallbot::error::{RecallError, Result};

/// Terminal console. The quit word never reaches the session: it is turned
/// into an end-of-session signal here.
pub(crate) struct ReadlineConsole {
    editor: DefaultEditor,
    quit_word: String,
    prompt: String,
}

impl ReadlineConsole {
    pub(crate) fn new(quit_word: &str) -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| RecallError::Console(format!("failed to start line editor: {}", e)))?;
        Ok(Self {
            editor,
            quit_word: quit_word.to_string(),
            prompt: format!(">> You (enter '{}' to quit): ", quit_word),
        })
    }
}

/// Whether `input` ends the session. Exact match, like cache lookups.
pub(crate) fn is_quit(input: &str, quit_word: &str) -> bool {
    input == quit_word
}

/// Only `Y` and `y` count as yes.
pub(crate) fn is_yes(input: &str) -> bool {
    matches!(input, "Y" | "y")
}

/// Add a non-blank line to the in-memory history. Returns whether it was
/// recorded.
fn remember(editor: &mut DefaultEditor, line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    match editor.add_history_entry(line) {
        Ok(added) => added,
        Err(e) => {
            debug!(error = %e, "Could not record history entry");
            false
        }
    }
}

impl Console for ReadlineConsole {
    fn read_question(&mut self) -> Result<Option<String>> {
        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    if is_quit(&line, &self.quit_word) {
                        return Ok(None);
                    }
                    remember(&mut self.editor, &line);
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(RecallError::Console(e.to_string())),
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(is_yes(&line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
            Err(e) => Err(RecallError::Console(e.to_string())),
        }
    }

    fn show_answer(&mut self, resolution: &Resolution) {
        match resolution.source {
            AnswerSource::Cache => println!("Answering from the local cache!"),
            AnswerSource::Generated => println!("Answering from the model!"),
        }
        println!(">> RecallBot: {}", resolution.answer);
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }

    fn report_failure(&mut self, message: &str) {
        eprintln!("!! {}", message);
    }
}
