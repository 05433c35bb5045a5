pub mod prompt;

use std::io::Write;
use std::process::ExitCode;

use clap::ValueEnum;
use color_print::cformat;
use eyre::Result;
use prompt::generate_prompt;
use tracing::{debug, warn};

use crate::assistant::conversation_state::{ConversationState, Role};
use crate::assistant::{next_chunk, ChunkedResponse, SafetyAssistant, TravelBudgetAssistant};
use crate::config::Config;

const SAFETY_WELCOME_TEXT: &str = "
Hi, I'm your Safety Assistant. Ask me anything about staying safe.

Things to try
• What should I do in an emergency?
• Give me some fire safety tips.
• Basic first aid for a burn?

/help         Show the help dialogue
/quit         Quit the application
";

const TRAVEL_WELCOME_TEXT: &str = "
Hi, I'm your Travel Budget Assistant. Tell me about your trip.

Things to try
• My budget is 3k for a trip to Lisbon for 5 days.
• Give me a budget breakdown.
• Any local tips to save money?

/help         Show the help dialogue
/quit         Quit the application
";

const HELP_TEXT: &str = "
Assistant Chat

/history      Show this conversation so far
/help         Show this help dialogue
/quit         Quit the application
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssistantKind {
    Safety,
    Travel,
}

impl AssistantKind {
    fn name(self) -> &'static str {
        match self {
            AssistantKind::Safety => "safety",
            AssistantKind::Travel => "travel",
        }
    }
}

enum Session {
    Safety(SafetyAssistant),
    Travel(TravelBudgetAssistant),
}

impl Session {
    fn history(&self) -> &ConversationState {
        match self {
            Session::Safety(assistant) => assistant.history(),
            Session::Travel(assistant) => assistant.history(),
        }
    }
}

pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    kind: AssistantKind,
    session: Option<Session>,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: Option<String>,
        interactive: bool,
        kind: AssistantKind,
    ) -> Self {
        Self {
            output,
            input,
            interactive,
            kind,
            session: None,
        }
    }

    pub async fn run(&mut self, config: &Config) -> Result<ExitCode> {
        let session = match self.kind {
            AssistantKind::Safety => SafetyAssistant::new(config).map(Session::Safety),
            AssistantKind::Travel => TravelBudgetAssistant::new(config).map(Session::Travel),
        };
        self.session = match session {
            Ok(session) => Some(session),
            Err(e) => {
                writeln!(self.output, "Failed to initialize {} assistant: {}", self.kind.name(), e)?;
                return Ok(ExitCode::FAILURE);
            }
        };

        // Handle non-interactive mode (single query)
        if let Some(input) = self.input.take() {
            self.handle_input(&input).await?;
            return Ok(ExitCode::SUCCESS);
        }

        if self.interactive {
            self.print_welcome()?;
            self.run_interactive().await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    fn print_welcome(&mut self) -> Result<()> {
        let welcome = match self.kind {
            AssistantKind::Safety => SAFETY_WELCOME_TEXT,
            AssistantKind::Travel => TRAVEL_WELCOME_TEXT,
        };
        writeln!(self.output, "{}", welcome)?;
        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;
        let history_path = prompt::history_path();
        if let Some(path) = &history_path {
            if rl.load_history(path).is_err() {
                debug!("No input history at {}", path.display());
            }
        }

        loop {
            let prompt_text = generate_prompt(Some(self.kind.name()));
            let readline = rl.readline(&prompt_text);

            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line.as_str());

                    if line.trim() == "/quit" {
                        break;
                    }

                    if let Err(e) = self.handle_input(&line).await {
                        writeln!(self.output, "Error: {}", e)?;
                    }
                }
                Err(e) => {
                    debug!("Leaving chat: {}", e);
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            if let Err(e) = rl.save_history(path) {
                warn!("Could not save input history to {}: {}", path.display(), e);
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<()> {
        match input.trim() {
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            "/history" => {
                self.print_history()?;
            }
            message => {
                self.process_chat_input(message).await?;
            }
        }

        Ok(())
    }

    async fn process_chat_input(&mut self, input: &str) -> Result<()> {
        match self.session.as_mut() {
            Some(Session::Safety(assistant)) => {
                let first = assistant.process(input).await;
                self.display_chunks(first)?;
            }
            Some(Session::Travel(assistant)) => {
                let response = assistant.process(input).await;
                writeln!(self.output, "{}", cformat!("<cyan,bold>Assistant:</> {}", response))?;
            }
            None => {
                writeln!(self.output, "The assistant is not available.")?;
            }
        }

        Ok(())
    }

    /// Prints a safety reply chunk by chunk, fetching each remainder the same
    /// way an HTTP client would.
    fn display_chunks(&mut self, first: ChunkedResponse) -> Result<()> {
        let mut current = first;
        writeln!(self.output, "{}", cformat!("<cyan,bold>Assistant:</> {}", current.chunk))?;
        while current.has_more {
            current = next_chunk(current.remaining_chunks);
            writeln!(self.output, "{}", current.chunk)?;
        }
        Ok(())
    }

    fn print_history(&mut self) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };

        let mut lines = Vec::new();
        for message in session.history().get_messages() {
            let speaker = match message.role {
                Role::User => cformat!("<green,bold>You</>"),
                Role::Assistant => cformat!("<cyan,bold>Assistant</>"),
            };
            lines.push(format!(
                "{} [{}]: {}",
                speaker,
                message.at.format("%H:%M:%S"),
                message.content
            ));
        }

        if lines.is_empty() {
            writeln!(self.output, "No messages yet.")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }
}
