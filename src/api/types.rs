//! Voice-platform request and response envelopes

use crate::runtime::Turn;
use crate::state_machine::{Event, Reply};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const GUESS_SLOT: &str = "guess";

/// Incoming request envelope
#[derive(Debug, Clone, Deserialize)]
pub struct SkillRequest {
    pub session: SessionInfo,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    #[serde(default)]
    pub new: bool,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    LaunchRequest,
    IntentRequest {
        intent: Intent,
    },
    SessionEndedRequest {
        #[serde(default)]
        reason: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

impl Intent {
    fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Map platform intent names onto game events
    pub fn to_event(&self) -> Event {
        match self.name.as_str() {
            "AMAZON.YesIntent" => Event::Yes,
            "AMAZON.NoIntent" => Event::No,
            "AMAZON.HelpIntent" => Event::Help,
            "AMAZON.CancelIntent" | "AMAZON.StopIntent" => Event::Stop,
            "AMAZON.FallbackIntent" => Event::Fallback,
            "GuessIntent" => self
                .slot_value(GUESS_SLOT)
                .map_or(Event::Unrecognized, Event::guess),
            _ => Event::Unrecognized,
        }
    }
}

impl SkillRequest {
    /// Normalize into a runtime turn
    pub fn into_turn(self) -> Turn {
        let event = match &self.request {
            RequestBody::LaunchRequest => Event::Launch,
            RequestBody::IntentRequest { intent } => intent.to_event(),
            RequestBody::SessionEndedRequest { reason } => Event::SessionEnded {
                reason: reason.clone(),
            },
            RequestBody::Unknown => Event::Unrecognized,
        };

        Turn {
            user_id: self.session.user.user_id,
            session_id: self.session.session_id,
            new_session: self.session.new,
            event,
        }
    }
}

/// Outgoing response envelope
#[derive(Debug, Clone, Serialize)]
pub struct SkillResponse {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl OutputSpeech {
    fn plain(text: String) -> Self {
        Self {
            kind: "PlainText",
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl SkillResponse {
    pub fn from_reply(reply: Option<Reply>) -> Self {
        let response = reply.map_or_else(ResponseBody::default, |reply| ResponseBody {
            output_speech: Some(OutputSpeech::plain(reply.speech_text)),
            reprompt: reply.reprompt_text.map(|text| Reprompt {
                output_speech: OutputSpeech::plain(text),
            }),
            should_end_session: Some(reply.should_end_session),
        });

        Self {
            version: "1.0",
            response,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub users: u64,
}
