//! Chat assistant: builds an employee context block, forwards the question to
//! a chat-completion backend, and reads a destination page out of the reply.

mod client;
mod context;
mod navigation;

pub use client::{
    AssistantError, ChatCompletion, ChatMessage, ChatRole, CompletionRequest,
    OpenAiCompatibleClient,
};
pub use context::{build_context, user_message, SYSTEM_PROMPT};
pub use navigation::{navigate, Page};

use crate::workflows::attendance::AttendanceDataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantQuestion {
    pub employee: String,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<Page>,
}

/// Composes the attendance dataset with a chat backend.
pub struct Assistant<C> {
    dataset: Arc<AttendanceDataset>,
    client: Arc<C>,
    model: String,
    temperature: f32,
}

impl<C: ChatCompletion> Assistant<C> {
    pub fn new(
        dataset: Arc<AttendanceDataset>,
        client: Arc<C>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            dataset,
            client,
            model: model.into(),
            temperature,
        }
    }

    /// Prompt sent for `question`; exposed so callers can show or log it.
    pub fn prepare(&self, question: &AssistantQuestion) -> Result<CompletionRequest, AssistantError> {
        if question.employee.trim().is_empty() || question.question.trim().is_empty() {
            return Err(AssistantError::InvalidRequest(
                "Please select an employee and enter a question.",
            ));
        }

        let result = self
            .dataset
            .query_employee(&question.employee, question.start, question.end);
        let include_window = question.start.is_some() || question.end.is_some();
        let context = build_context(&result, include_window);

        Ok(CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(user_message(&context, &question.question)),
            ],
            temperature: self.temperature,
        })
    }

    pub async fn ask(&self, question: &AssistantQuestion) -> Result<AssistantReply, AssistantError> {
        let request = self.prepare(question)?;

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(employee = %question.employee, error = %err, "chat completion failed");
                return Err(err);
            }
        };

        let navigate_to = navigate(&response);
        info!(
            employee = %question.employee,
            navigate_to = navigate_to.map(Page::label),
            "assistant replied"
        );

        Ok(AssistantReply {
            response,
            navigate_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::attendance::{JoinPolicy, RawProjectLogEntry};
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedChat {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ChatCompletion for ScriptedChat {
        async fn complete(&self, request: CompletionRequest) -> Result<String, AssistantError> {
            self.requests.lock().expect("requests mutex").push(request);
            self.reply.clone().ok_or(AssistantError::EmptyResponse)
        }
    }

    fn assistant(reply: Option<&str>) -> (Assistant<ScriptedChat>, Arc<ScriptedChat>) {
        let dataset = AttendanceDataset::load(
            Vec::new(),
            Vec::new(),
            vec![
                RawProjectLogEntry::new("Alice", "ProjA", "01/05/2023", 4.0),
                RawProjectLogEntry::new("Bob", "ProjA", "02/10/2023", 6.0),
            ],
            JoinPolicy::Outer,
        )
        .expect("dataset loads");
        let chat = Arc::new(ScriptedChat {
            reply: reply.map(str::to_string),
            ..ScriptedChat::default()
        });
        let assistant = Assistant::new(Arc::new(dataset), chat.clone(), "local-model", 0.7);
        (assistant, chat)
    }

    fn question(employee: &str, text: &str) -> AssistantQuestion {
        AssistantQuestion {
            employee: employee.to_string(),
            start: None,
            end: None,
            question: text.to_string(),
        }
    }

    #[tokio::test]
    async fn ask_sends_context_and_reads_navigation() {
        let (assistant, chat) = assistant(Some("Taking you to the Visualization page."));
        let reply = assistant
            .ask(&question("Alice", "Show me charts"))
            .await
            .expect("reply");

        assert_eq!(reply.navigate_to, Some(Page::Visualization));

        let requests = chat.requests.lock().expect("requests mutex");
        let request = &requests[0];
        assert_eq!(request.model, "local-model");
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        let user = &request.messages[1].content;
        assert!(user.contains("Total Hours Worked: 4"));
        assert!(user.contains("Coworkers: Bob"));
        assert!(user.contains("Total Workdays: N/A"));
        assert!(!user.contains("Date Range"));
        assert!(user.ends_with("Question or Navigation: Show me charts"));
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_calling_backend() {
        let (assistant, chat) = assistant(Some("unused"));
        let error = assistant
            .ask(&question("Alice", "   "))
            .await
            .expect_err("blank question rejected");

        assert!(matches!(error, AssistantError::InvalidRequest(_)));
        assert!(chat.requests.lock().expect("requests mutex").is_empty());
    }

    #[tokio::test]
    async fn backend_errors_surface_to_caller() {
        let (assistant, _) = assistant(None);
        let error = assistant
            .ask(&question("Alice", "hours?"))
            .await
            .expect_err("backend failure");
        assert!(matches!(error, AssistantError::EmptyResponse));
    }

    #[test]
    fn window_appears_in_context_when_requested() {
        let (assistant, _) = assistant(None);
        let mut asked = question("Alice", "hours in January?");
        asked.end = NaiveDate::from_ymd_opt(2023, 1, 31);

        let request = assistant.prepare(&asked).expect("request builds");
        assert!(request.messages[1]
            .content
            .contains("Date Range: 2023-01-05 to 2023-01-31"));
    }
}
