pub mod metrics;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod rules;
pub mod store;

pub use orchestrator::ChatOrchestrator;
pub use prompt::PromptBuilder;
pub use providers::{ChatProvider, MockChatProvider, OpenAiChatProvider, OpenAiConfig};
pub use rules::{RuleEngine, RuleOutcome};
pub use store::{ConversationStore, InMemoryConversationStore};
