pub mod prompt;
pub mod questions;
pub mod tips;

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use prompt::{emergency_prompt, general_prompt, health_prompt};
use questions::FollowUpQuestions;
use tips::{category_in, render_tips, SAFETY_CATEGORIES};

use crate::assistant::chunker::{chunk_response, ChunkedResponse};
use crate::assistant::conversation_state::ConversationState;
use crate::assistant::router::KeywordRouter;
use crate::completion::{apology, try_complete, Completion};
use crate::config::Config;
use crate::gemini_client::GeminiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyRoute {
    Emergency,
    Tips,
    Health,
    General,
}

const EMERGENCY_KEYWORDS: &[&str] = &["emergency", "help", "danger", "unsafe"];
const TIPS_KEYWORDS: &[&str] = &["safety tips", "guidelines", "advice"];
const HEALTH_KEYWORDS: &[&str] = &["first aid", "medical", "health"];

const ROUTER: KeywordRouter<SafetyRoute> = KeywordRouter::new(
    &[
        (EMERGENCY_KEYWORDS, SafetyRoute::Emergency),
        (TIPS_KEYWORDS, SafetyRoute::Tips),
        (HEALTH_KEYWORDS, SafetyRoute::Health),
    ],
    SafetyRoute::General,
);

pub fn route(message: &str) -> SafetyRoute {
    ROUTER.route(message)
}

/// One safety conversation: history, follow-up question state and the
/// completion backend it talks to.
pub struct SafetyAssistant {
    completion: Arc<dyn Completion>,
    timeout: Duration,
    conversation_state: ConversationState,
    follow_ups: FollowUpQuestions,
    rng: StdRng,
}

impl SafetyAssistant {
    pub fn new(config: &Config) -> Result<Self> {
        let client = GeminiClient::new(config)?;
        info!("Safety assistant initialized");
        Ok(Self::with_completion(Arc::new(client), config.request_timeout))
    }

    pub fn with_completion(completion: Arc<dyn Completion>, timeout: Duration) -> Self {
        Self {
            completion,
            timeout,
            conversation_state: ConversationState::new(),
            follow_ups: FollowUpQuestions::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn history(&self) -> &ConversationState {
        &self.conversation_state
    }

    pub fn follow_ups(&self) -> &FollowUpQuestions {
        &self.follow_ups
    }

    /// Answers one message and returns the first chunk of the reply along
    /// with the chunks the client should fetch afterwards.
    pub async fn process(&mut self, user_message: &str) -> ChunkedResponse {
        self.conversation_state.add_user_message(user_message);

        let route = route(user_message);
        debug!("Routing safety message to {:?}", route);

        let response = match route {
            SafetyRoute::Emergency => self.generate(&emergency_prompt(user_message)).await,
            SafetyRoute::Tips => self.provide_safety_tips(user_message),
            SafetyRoute::Health => self.generate(&health_prompt(user_message)).await,
            SafetyRoute::General => self.answer_general_query(user_message).await,
        };

        let chunks = chunk_response(&response);
        debug!("Split safety response into {} chunks", chunks.len());

        self.conversation_state.add_assistant_message(&response);

        ChunkedResponse::from_chunks(chunks)
    }

    async fn generate(&self, prompt: &str) -> String {
        try_complete(self.completion.as_ref(), prompt, self.timeout)
            .await
            .unwrap_or_else(|e| apology(&e))
    }

    async fn answer_general_query(&mut self, user_message: &str) -> String {
        let prompt = general_prompt(user_message);
        match try_complete(self.completion.as_ref(), &prompt, self.timeout).await {
            Ok(mut response) => {
                response.push_str("\n\n");
                response.push_str(&self.follow_ups.next_question(&mut self.rng));
                response
            }
            // No follow-up after an apology.
            Err(e) => apology(&e),
        }
    }

    fn provide_safety_tips(&mut self, user_message: &str) -> String {
        let category = category_in(user_message)
            .or_else(|| SAFETY_CATEGORIES.choose(&mut self.rng).copied())
            .unwrap_or(SAFETY_CATEGORIES[0]);

        let mut response = render_tips(category);
        response.push('\n');
        response.push_str(&self.follow_ups.next_question(&mut self.rng));
        response
    }
}

#[cfg(test)]
mod tests {
    use crate::assistant::chunker::next_chunk;
    use crate::assistant::conversation_state::Role;
    use crate::completion::testing::ScriptedCompletion;

    use super::*;

    fn assistant(stub: &Arc<ScriptedCompletion>) -> SafetyAssistant {
        SafetyAssistant::with_completion(stub.clone(), Duration::from_secs(1))
            .with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn routes_by_keyword_group_order() {
        assert_eq!(route("There is DANGER here"), SafetyRoute::Emergency);
        assert_eq!(route("any guidelines for hiking?"), SafetyRoute::Tips);
        assert_eq!(route("basic first aid please"), SafetyRoute::Health);
        assert_eq!(route("how do I store knives"), SafetyRoute::General);
    }

    #[test]
    fn emergency_beats_tips() {
        assert_eq!(route("emergency! I need safety tips"), SafetyRoute::Emergency);
        // "help" is an emergency keyword, so it outranks health too.
        assert_eq!(route("help with medical stuff"), SafetyRoute::Emergency);
    }

    #[tokio::test]
    async fn emergency_message_uses_emergency_prompt() {
        let stub = Arc::new(ScriptedCompletion::always("🚨 EMERGENCY RESPONSE\n- Call 911"));
        let mut assistant = assistant(&stub);

        let result = assistant.process("the building is unsafe").await;

        assert_eq!(result.chunk, "🚨 EMERGENCY RESPONSE\n- Call 911");
        assert!(!result.has_more);
        assert!(stub
            .last_prompt()
            .unwrap()
            .contains("emergency situation: the building is unsafe"));
        assert!(assistant.follow_ups().last_question_asked().is_none());
    }

    #[tokio::test]
    async fn tips_are_served_without_the_completion_service() {
        let stub = Arc::new(ScriptedCompletion::always("unused"));
        let mut assistant = assistant(&stub);

        let result = assistant.process("fire safety guidelines").await;

        assert_eq!(stub.calls(), 0);
        assert!(result.chunk.starts_with("🔒 Fire Safety Tips:\n• Install smoke detectors"));
        let question = assistant.follow_ups().last_question_asked().unwrap().to_string();
        let mut all = vec![result.chunk];
        all.extend(result.remaining_chunks);
        assert!(all.join("\n").ends_with(&question));
    }

    #[tokio::test]
    async fn general_reply_gets_follow_up_question() {
        let stub = Arc::new(ScriptedCompletion::always("🔥 Keep exits clear."));
        let mut assistant = assistant(&stub);

        let result = assistant.process("tell me about ladders").await;

        let question = assistant.follow_ups().last_question_asked().unwrap();
        assert_eq!(result.chunk, format!("🔥 Keep exits clear.\n{}", question));

        let history = assistant.history().get_messages();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, format!("🔥 Keep exits clear.\n\n{}", question));
    }

    #[tokio::test]
    async fn long_reply_is_delivered_across_chunks() {
        let reply = (0..12)
            .map(|i| format!("- Subpoint {}: keep walkways, stairs and exits clear of clutter", i))
            .collect::<Vec<_>>()
            .join("\n");
        let stub = Arc::new(ScriptedCompletion::always(&reply));
        let mut assistant = assistant(&stub);

        let mut result = assistant.process("tidy house").await;
        assert!(result.has_more);

        let mut delivered = vec![result.chunk.clone()];
        while result.has_more {
            result = next_chunk(result.remaining_chunks);
            delivered.push(result.chunk.clone());
        }
        assert!(result.remaining_chunks.is_empty());

        let expected = chunk_response(&assistant.history().get_messages()[1].content);
        assert_eq!(delivered, expected);
    }

    #[tokio::test]
    async fn completion_failure_is_a_single_apology() {
        let stub = Arc::new(ScriptedCompletion::failing("service unavailable"));
        let mut assistant = assistant(&stub);

        let result = assistant.process("what about ladders").await;

        assert!(result.chunk.starts_with("I apologize"));
        assert!(result.chunk.contains("service unavailable"));
        assert!(!result.has_more);
        assert!(result.remaining_chunks.is_empty());
        assert_eq!(assistant.history().len(), 2);
    }

    #[tokio::test]
    async fn follow_up_questions_do_not_run_three_deep() {
        let stub = Arc::new(ScriptedCompletion::always("ok"));
        let mut assistant = assistant(&stub);

        let mut previous: Vec<String> = Vec::new();
        for _ in 0..60 {
            assistant.process("something general").await;
            previous.push(assistant.follow_ups().last_question_asked().unwrap().to_string());
        }
        assert!(previous.windows(3).all(|w| !(w[0] == w[1] && w[1] == w[2])));
        assert_eq!(assistant.history().len(), 120);
    }
}
