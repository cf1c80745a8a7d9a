//! Retrieval orchestration: analyse the query, search the graph, assemble
//! context, and answer through the chat model or the intent handlers.

pub mod context;
pub mod intents;
pub mod prompt;

pub use context::{build_context, ContextLimits, NO_CONTEXT};
pub use intents::{intent_response, resolve_entity};

use crate::config::RetrievalConfig;
use crate::graph::{KnowledgeGraph, SearchResult};
use crate::llm::{ChatClient, ChatMessage};
use crate::nlp::{QueryAnalysis, TextAnalyzer};
use serde::Serialize;
use std::collections::VecDeque;

const TOPIC_PREVIEW_CHARS: usize = 50;

/// One user turn and the answer given
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

/// An answer with the analysis and retrieval that produced it
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub text: String,
    /// True when the chat model did not produce the answer
    pub degraded: bool,
    pub analysis: QueryAnalysis,
    pub results: Vec<SearchResult>,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub total_exchanges: usize,
    pub recent_topics: Vec<String>,
    /// Characters across all user and assistant turns
    pub conversation_length: usize,
}

pub struct Assistant {
    analyzer: TextAnalyzer,
    chat: Option<ChatClient>,
    config: RetrievalConfig,
    history: VecDeque<Exchange>,
}

impl Assistant {
    pub fn new(analyzer: TextAnalyzer, chat: Option<ChatClient>, config: RetrievalConfig) -> Self {
        Self {
            analyzer,
            chat,
            config,
            history: VecDeque::new(),
        }
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    pub fn chat_available(&self) -> bool {
        self.chat.is_some()
    }

    /// Answer `query` from the graph and record the exchange.
    ///
    /// Never fails. Without a chat model, or when the call fails, the answer
    /// comes from the intent handlers and `degraded` is set.
    pub async fn respond(&mut self, query: &str, graph: &KnowledgeGraph) -> Response {
        let analysis = self.analyzer.preprocess_query(query);
        let results = graph.semantic_search(query, self.config.top_k).await;
        let context = build_context(&results, &analysis, ContextLimits::from(&self.config));

        let (text, degraded) = match &self.chat {
            Some(chat) => {
                let messages = self.messages(query, &context, &analysis);
                match chat.complete(&messages).await {
                    Ok(reply) => (reply, false),
                    Err(e) => {
                        log::error!("Chat completion failed: {}", e);
                        let fallback = intent_response(analysis.intent, &analysis.entities, graph);
                        (format!("{}\n\n{}", apology(&e), fallback), true)
                    }
                }
            }
            None => (intent_response(analysis.intent, &analysis.entities, graph), true),
        };

        self.record(query, &text);

        Response {
            text,
            degraded,
            analysis,
            results,
            context,
        }
    }

    /// System prompt, the most recent exchanges, then the context-bearing
    /// user message.
    pub fn messages(&self, query: &str, context: &str, analysis: &QueryAnalysis) -> Vec<ChatMessage> {
        let window = self.config.history_window.min(self.history.len());
        let mut messages = vec![ChatMessage::system(prompt::SYSTEM_PROMPT)];
        for exchange in self.history.iter().skip(self.history.len() - window) {
            messages.push(ChatMessage::user(exchange.user.clone()));
            messages.push(ChatMessage::assistant(exchange.assistant.clone()));
        }
        messages.push(ChatMessage::user(prompt::user_message(query, context, analysis)));
        messages
    }

    fn record(&mut self, query: &str, answer: &str) {
        self.history.push_back(Exchange {
            user: query.to_string(),
            assistant: answer.to_string(),
        });
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &Exchange> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn conversation_summary(&self) -> ConversationSummary {
        let window = self.config.history_window.min(self.history.len());
        ConversationSummary {
            total_exchanges: self.history.len(),
            recent_topics: self
                .history
                .iter()
                .skip(self.history.len() - window)
                .map(|exchange| {
                    let preview: String = exchange.user.chars().take(TOPIC_PREVIEW_CHARS).collect();
                    format!("{}...", preview)
                })
                .collect(),
            conversation_length: self
                .history
                .iter()
                .map(|exchange| exchange.user.chars().count() + exchange.assistant.chars().count())
                .sum(),
        }
    }
}

fn apology(error: &crate::error::SatqaError) -> String {
    format!(
        "I apologize, but I encountered an error while processing your query: {}. \
         Please try rephrasing your question or contact support if the issue persists.",
        error
    )
}
