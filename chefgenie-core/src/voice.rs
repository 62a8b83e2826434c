//! Voice dictation for text fields.
//!
//! Capture is single-shot: one utterance per call, and the transcript replaces
//! the field's contents. Systems without a recognizer report
//! [`VoiceError::Unsupported`] so callers can tell the user instead of failing.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::VoiceError;

/// Default recognition language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture one utterance. `Ok(None)` means nothing was heard.
    async fn recognize_once(&self) -> Result<Option<String>, VoiceError>;
}

#[async_trait]
impl<T: SpeechRecognizer + ?Sized> SpeechRecognizer for Box<T> {
    async fn recognize_once(&self) -> Result<Option<String>, VoiceError> {
        (**self).recognize_once().await
    }
}

/// Recognizer for systems without speech support.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    async fn recognize_once(&self) -> Result<Option<String>, VoiceError> {
        Err(VoiceError::Unsupported)
    }
}

/// Runs an external dictation program and reads the transcript from stdout.
///
/// The program is run through the shell and receives the language tag in
/// `CHEFGENIE_DICTATION_LANG`.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: String,
    language: String,
}

impl CommandRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize_once(&self) -> Result<Option<String>, VoiceError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("CHEFGENIE_DICTATION_LANG", &self.language)
            .output()
            .await
            .map_err(|e| VoiceError::Failed(format!("Failed to start dictation: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoiceError::Failed(format!(
                "Dictation exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(transcript).filter(|t| !t.is_empty()))
    }
}

/// Recognizer chosen from the environment.
///
/// Uses `CHEFGENIE_DICTATION_CMD` if set (and `CHEFGENIE_DICTATION_LANG` for
/// the language), otherwise reports voice input as unsupported.
pub fn recognizer_from_env() -> Box<dyn SpeechRecognizer> {
    match std::env::var("CHEFGENIE_DICTATION_CMD") {
        Ok(command) if !command.trim().is_empty() => {
            let language = std::env::var("CHEFGENIE_DICTATION_LANG")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());
            Box::new(CommandRecognizer::new(command).with_language(language))
        }
        _ => Box::new(UnsupportedRecognizer),
    }
}

/// Dictation into a text field.
pub struct VoiceInput<R: SpeechRecognizer> {
    recognizer: R,
}

impl<R: SpeechRecognizer> VoiceInput<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Capture one utterance and replace `field` with it.
    ///
    /// Returns whether the field changed. When nothing was heard the field is
    /// left alone.
    pub async fn dictate_into(&self, field: &mut String) -> Result<bool, VoiceError> {
        match self.recognizer.recognize_once().await? {
            Some(transcript) => {
                *field = transcript;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
