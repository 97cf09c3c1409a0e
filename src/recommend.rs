//! Recommendation gateway. Formats a customer's visit history into a
//! structured-output completion request and parses the model's answer.

use std::env;
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ActionError;
use crate::schema::FieldErrors;

const SYSTEM_PROMPT: &str = "You are a concierge for a salon discovery app. \
    Recommend salon services that fit the customer's visit history and stated preferences. \
    Only suggest services a typical salon offers.";

const FALLBACK_HISTORY: &str =
    "This customer has no recorded visits yet and is open to popular salon services.";

const FALLBACK_REASONING: &str =
    "Here are a few popular services to get you started. Book a visit and we will \
     tailor future suggestions to your history.";

const MAX_COMPLETION_TOKENS: u32 = 512;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub customer_id: Option<String>,
    pub history: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommended_services: Vec<String>,
    pub reasoning: String,
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "recommendedServices": {
                "type": "array",
                "items": { "type": "string" }
            },
            "reasoning": { "type": "string" }
        },
        "required": ["recommendedServices", "reasoning"],
        "additionalProperties": false
    })
}

/// One structured-output completion. Implementations return the raw JSON
/// document produced by the model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ActionError>;
}

/// OpenAI-compatible backend. `api_base` lets deployments point at a proxy
/// or a compatible third-party endpoint.
pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletion {
    pub fn new(api_key: &str, api_base: Option<&str>, model: String) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        OpenAiCompletion {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ActionError> {
        let json_schema = ResponseFormatJsonSchema {
            description: None,
            name: "salon_recommendations".to_string(),
            schema: Some(response_schema()),
            strict: Some(true),
        };

        let request = CreateChatCompletionRequestArgs::default()
            .max_tokens(MAX_COMPLETION_TOKENS)
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessage::from(system_prompt).into(),
                ChatCompletionRequestUserMessage::from(user_prompt).into(),
            ])
            .response_format(ResponseFormat::JsonSchema { json_schema })
            .build()
            .map_err(|err| ActionError::unavailable(err.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|err| ActionError::unavailable(err.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ActionError::unavailable("completion returned no content"))
    }
}

#[derive(Clone)]
pub struct Recommender {
    client: Option<Arc<dyn CompletionClient>>,
}

impl Recommender {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Recommender {
            client: Some(client),
        }
    }

    /// Gateway with no backend configured. Requests fail with an availability
    /// error instead of a crash at call time.
    pub fn disabled() -> Self {
        Recommender { client: None }
    }

    /// Reads `OPENAI_API_KEY`, `OPENAI_API_BASE` and `AI_MODEL`. Without a
    /// key the gateway starts disabled.
    pub fn from_env() -> Self {
        let model = env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        match env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                let base = env::var("OPENAI_API_BASE").ok();
                Recommender::new(Arc::new(OpenAiCompletion::new(
                    &key,
                    base.as_deref(),
                    model,
                )))
            }
            _ => {
                log::warn!("OPENAI_API_KEY not set. Recommendations are disabled.");
                Recommender::disabled()
            }
        }
    }

    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<Recommendations, ActionError> {
        let customer_id = request
            .customer_id
            .map(|id| id.trim().to_string())
            .unwrap_or_default();
        if customer_id.is_empty() {
            return Err(ActionError::Validation(FieldErrors::single(
                "customerId",
                "is required",
            )));
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ActionError::unavailable("recommendation backend is not configured"))?;

        let history = match request.history.map(|text| text.trim().to_string()) {
            Some(text) if !text.is_empty() => text,
            _ => FALLBACK_HISTORY.to_string(),
        };
        let user_prompt = format!(
            "Customer history and preferences: {history}\n\
             Recommend up to three services for their next visit."
        );

        let raw = client.complete(SYSTEM_PROMPT, &user_prompt).await?;
        let mut recommendations: Recommendations = serde_json::from_str(&raw).map_err(|_| {
            ActionError::UpstreamData(FieldErrors::single(
                "recommendations",
                "model returned a malformed document",
            ))
        })?;

        // Zero recommendations is not a failure; the reasoning must still say
        // something useful.
        if recommendations.recommended_services.is_empty()
            || recommendations.reasoning.trim().is_empty()
        {
            recommendations.reasoning = FALLBACK_REASONING.to_string();
        }

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted(&'static str);

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, _: &str, _: &str) -> Result<String, ActionError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(&self, _: &str, _: &str) -> Result<String, ActionError> {
            Err(ActionError::unavailable("scripted outage"))
        }
    }

    #[derive(Default)]
    struct Recording {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionClient for Recording {
        async fn complete(&self, _: &str, user_prompt: &str) -> Result<String, ActionError> {
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            Ok(r#"{"recommendedServices":["Classic Haircut"],"reasoning":"A fresh start."}"#
                .to_string())
        }
    }

    fn request(customer_id: Option<&str>, history: Option<&str>) -> RecommendationRequest {
        RecommendationRequest {
            customer_id: customer_id.map(str::to_string),
            history: history.map(str::to_string),
        }
    }

    #[actix_web::test]
    async fn missing_customer_id_fails_before_anything_else() {
        let gateway = Recommender::disabled();
        for id in [None, Some(""), Some("   ")] {
            let err = gateway.recommend(request(id, None)).await.unwrap_err();
            match err {
                ActionError::Validation(fields) => assert!(fields.contains("customerId")),
                other => panic!("expected validation, got {other:?}"),
            }
        }
    }

    #[actix_web::test]
    async fn unconfigured_backend_is_an_availability_error() {
        let gateway = Recommender::disabled();
        let err = gateway
            .recommend(request(Some("uid-1"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Unavailable(_)));
    }

    #[actix_web::test]
    async fn parses_the_model_document() {
        let gateway = Recommender::new(Arc::new(Scripted(
            r#"{"recommendedServices":["Hot Towel Shave","Beard Trim"],"reasoning":"You book grooming often."}"#,
        )));

        let result = gateway
            .recommend(request(Some("uid-1"), Some("two beard trims last month")))
            .await
            .unwrap();
        assert_eq!(
            result.recommended_services,
            vec!["Hot Towel Shave", "Beard Trim"]
        );
        assert_eq!(result.reasoning, "You book grooming often.");
    }

    #[actix_web::test]
    async fn empty_recommendations_get_the_fallback_reasoning() {
        let gateway = Recommender::new(Arc::new(Scripted(
            r#"{"recommendedServices":[],"reasoning":""}"#,
        )));

        let result = gateway
            .recommend(request(Some("uid-1"), None))
            .await
            .unwrap();
        assert!(result.recommended_services.is_empty());
        assert_eq!(result.reasoning, FALLBACK_REASONING);
    }

    #[actix_web::test]
    async fn malformed_model_output_is_upstream_data() {
        let gateway = Recommender::new(Arc::new(Scripted("not json at all")));
        let err = gateway
            .recommend(request(Some("uid-1"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::UpstreamData(_)));
    }

    #[actix_web::test]
    async fn backend_failure_passes_through() {
        let gateway = Recommender::new(Arc::new(Failing));
        let err = gateway
            .recommend(request(Some("uid-1"), None))
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::Unavailable("scripted outage".to_string()));
    }

    #[actix_web::test]
    async fn history_is_embedded_and_defaulted() {
        let recording = Arc::new(Recording::default());
        let gateway = Recommender::new(recording.clone());

        gateway
            .recommend(request(Some("uid-1"), Some("loves balayage")))
            .await
            .unwrap();
        gateway
            .recommend(request(Some("uid-1"), Some("   ")))
            .await
            .unwrap();

        let prompts = recording.prompts.lock().unwrap();
        assert!(prompts[0].contains("loves balayage"));
        assert!(prompts[1].contains(FALLBACK_HISTORY));
    }
}
