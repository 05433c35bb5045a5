pub mod prompt;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tracing::{debug, info};

use prompt::{
    budget_breakdown_prompt, general_prompt, local_tips_prompt, savings_prompt, MISSING_BUDGET,
    MISSING_DESTINATION,
};
use state::TravelBudgetInfo;

use crate::assistant::conversation_state::ConversationState;
use crate::assistant::router::KeywordRouter;
use crate::completion::{complete_or_apologize, Completion};
use crate::config::Config;
use crate::gemini_client::GeminiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelRoute {
    BudgetBreakdown,
    Savings,
    LocalTips,
    General,
}

const BUDGET_KEYWORDS: &[&str] = &["budget", "breakdown"];
const SAVINGS_KEYWORDS: &[&str] = &["save", "savings"];
const LOCAL_KEYWORDS: &[&str] = &["local", "tips"];

const ROUTER: KeywordRouter<TravelRoute> = KeywordRouter::new(
    &[
        (BUDGET_KEYWORDS, TravelRoute::BudgetBreakdown),
        (SAVINGS_KEYWORDS, TravelRoute::Savings),
        (LOCAL_KEYWORDS, TravelRoute::LocalTips),
    ],
    TravelRoute::General,
);

pub fn route(message: &str) -> TravelRoute {
    ROUTER.route(message)
}

/// One travel budgeting conversation. Replies are returned whole.
pub struct TravelBudgetAssistant {
    completion: Arc<dyn Completion>,
    timeout: Duration,
    conversation_state: ConversationState,
    travel_budget_info: TravelBudgetInfo,
}

impl TravelBudgetAssistant {
    pub fn new(config: &Config) -> Result<Self> {
        let client = GeminiClient::new(config)?;
        info!("Travel budget assistant initialized");
        Ok(Self::with_completion(Arc::new(client), config.request_timeout))
    }

    pub fn with_completion(completion: Arc<dyn Completion>, timeout: Duration) -> Self {
        Self {
            completion,
            timeout,
            conversation_state: ConversationState::new(),
            travel_budget_info: TravelBudgetInfo::default(),
        }
    }

    pub fn history(&self) -> &ConversationState {
        &self.conversation_state
    }

    pub fn travel_budget_info(&self) -> &TravelBudgetInfo {
        &self.travel_budget_info
    }

    pub async fn process(&mut self, user_message: &str) -> String {
        self.conversation_state.add_user_message(user_message);
        self.travel_budget_info.update_from_message(user_message);

        let route = route(user_message);
        debug!("Routing travel message to {:?}", route);

        let info = &self.travel_budget_info;
        let prompt = match route {
            TravelRoute::BudgetBreakdown => {
                budget_breakdown_prompt(info).ok_or(MISSING_BUDGET)
            }
            TravelRoute::Savings => Ok(savings_prompt(info)),
            TravelRoute::LocalTips => local_tips_prompt(info).ok_or(MISSING_DESTINATION),
            TravelRoute::General => Ok(general_prompt(info, user_message)),
        };

        let response = match prompt {
            Ok(prompt) => {
                complete_or_apologize(self.completion.as_ref(), &prompt, self.timeout).await
            }
            Err(missing) => {
                debug!("Missing trip details, asking the user: {}", missing);
                missing.to_string()
            }
        };

        self.conversation_state.add_assistant_message(&response);
        response
    }
}
