// openai.rs
use crate::nlp::{Classifier, ClassifierError, ClassifierFields, LabelSet, LABEL_ERROR};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiClassifier {
    endpoint: String,
    api_key: String,
    model: String,
    labels: LabelSet,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatAnswer,
}

#[derive(Deserialize)]
struct ChatAnswer {
    content: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(
        api_key: String,
        model: String,
        labels: LabelSet,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        Ok(Self {
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
            api_key,
            model,
            labels,
            client,
        })
    }

    /// Points the classifier at an OpenAI-compatible endpoint other than the default.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_label(&self, prompt: String) -> Result<String, ClassifierError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
            max_tokens: 8,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(ClassifierError::Request(format!("HTTP {status}: {text}")));
        }

        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| ClassifierError::Response(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClassifierError::Response("no choices in response".to_string()))?;

        first_line(&content)
            .ok_or_else(|| ClassifierError::Response("empty answer".to_string()))
    }
}

impl Classifier for OpenAiClassifier {
    fn classify(&self, text: &str, fields: &ClassifierFields) -> Result<String, ClassifierError> {
        let fields_json =
            serde_json::to_string(fields).map_err(|e| ClassifierError::Input(e.to_string()))?;
        let prompt = build_prompt(&self.labels, text, &fields_json);

        match self.request_label(prompt) {
            Ok(label) => {
                tracing::info!(label = %label, "OpenAI label");
                Ok(label)
            }
            Err(e) => {
                tracing::error!(error = %e, "OpenAI classify error");
                Ok(LABEL_ERROR.to_string())
            }
        }
    }
}

fn build_prompt(labels: &LabelSet, listing_text: &str, fields: &str) -> String {
    format!(
        "You are a classifier. Given the property listing text and details, answer with one label: {}.\n\
         Return only the label.\n\n\
         Listing text:\n{listing_text}\n\n\
         Fields:\n{fields}\n",
        labels.labels().join(", ")
    )
}

fn first_line(answer: &str) -> Option<String> {
    answer
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_labels_and_fields() {
        let prompt = build_prompt(
            &LabelSet::default(),
            "12 Elm St as is",
            r#"{"price":500000}"#,
        );
        assert!(prompt.contains("answer with one label: development, not_development, maybe."));
        assert!(prompt.contains("Listing text:\n12 Elm St as is"));
        assert!(prompt.contains(r#"Fields:
{"price":500000}"#));
    }

    #[test]
    fn takes_first_non_empty_line() {
        assert_eq!(first_line("\n  maybe \nbecause...").as_deref(), Some("maybe"));
        assert_eq!(first_line("   \n"), None);
    }

    #[test]
    fn unreachable_service_yields_sentinel() {
        let classifier = OpenAiClassifier::new(
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            LabelSet::default(),
            Duration::from_secs(2),
        )
        .unwrap()
        .with_endpoint("http://127.0.0.1:1/v1/chat/completions");

        let fields = ClassifierFields {
            price: Some(450_000),
            beds: Some(3),
            baths: Some(1.5),
            living_area: Some(1400),
            ..Default::default()
        };
        let label = classifier.classify("12 Elm St", &fields).unwrap();
        assert_eq!(label, LABEL_ERROR);
    }
}
