//! End-to-end chat pipeline.
//!
//! One `run` call covers the whole request: contextualize the
//! conversation into a search query, compile the UI filters, retrieve
//! matching articles, assemble the grounding prompt, and open the
//! answer stream. The caller gets the stream plus the source articles
//! so it can surface both to the client.

use crate::assemble::{build_context, build_grounding_prompt, splice_grounding_message};
use crate::contextualize::contextual_query;
use newschat_core::{AppError, AppResult, Article, ChatFilters, ChatMessage, PublicationCatalog};
use newschat_index::{retrieve_articles, FilterExpr, SearchIndex};
use newschat_llm::{ChatModel, LlmClient, LlmRequest, LlmStream};
use std::fmt;
use std::sync::Arc;

/// Everything the transport layer needs to answer one chat request.
pub struct ChatOutcome {
    /// Incremental answer chunks from the model.
    pub stream: LlmStream,
    /// Articles the answer is grounded on, in retrieval order.
    pub sources: Vec<Article>,
    /// Model the answer is generated with.
    pub model: ChatModel,
}

// The stream is opaque; summarize the rest.
impl fmt::Debug for ChatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatOutcome")
            .field("stream", &"<chunk stream>")
            .field("sources", &self.sources.len())
            .field("model", &self.model)
            .finish()
    }
}

/// The retrieval-augmented chat pipeline.
pub struct ChatPipeline {
    llm: Arc<dyn LlmClient>,
    index: Arc<dyn SearchIndex>,
    catalog: PublicationCatalog,
}

impl ChatPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            llm,
            index,
            catalog: PublicationCatalog::default(),
        }
    }

    /// Answer one conversation.
    ///
    /// # Errors
    /// Returns [`AppError::RequestDecode`] for an empty conversation,
    /// and propagates contextualization, retrieval, and model errors
    /// from the stages.
    pub async fn run(
        &self,
        messages: &[ChatMessage],
        filters: &ChatFilters,
        use_reasoning_model: bool,
    ) -> AppResult<ChatOutcome> {
        let Some(last) = messages.last() else {
            return Err(AppError::RequestDecode(
                "Conversation must contain at least one message".to_string(),
            ));
        };

        let query = contextual_query(self.llm.as_ref(), messages).await?;
        let filter = FilterExpr::compile(filters);

        tracing::info!(
            %query,
            index = self.index.index_name(),
            "Retrieving sources for chat request"
        );

        let sources = retrieve_articles(self.index.as_ref(), &query, &filter).await?;

        tracing::debug!(sources = sources.len(), "Retrieval complete");

        let context = build_context(&sources, &self.catalog);
        let prompt = build_grounding_prompt(&context, &last.content)?;
        let augmented = splice_grounding_message(messages, prompt);

        let model = ChatModel::select(use_reasoning_model);
        let request = LlmRequest::new(augmented, model.as_str()).with_streaming();

        let stream = self.llm.stream(&request).await?;

        Ok(ChatOutcome {
            stream,
            sources,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::CITATION_GUIDELINES;
    use crate::testing::{collect_stream, MockIndex, MockLlm};
    use newschat_core::Role;
    use newschat_index::{SearchHit, TOP_K};
    use serde_json::json;

    fn hit(id: &str, publication: &str, title: &str) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            score: 0.8,
            fields: json!({
                "publication": publication,
                "publication_date": "2024-05-01T00:00:00Z",
                "scrape_timestamp": "2024-05-02T00:00:00Z",
                "text": "Article body.",
                "title": title,
                "url": format!("https://example.com/{id}"),
            }),
        }
    }

    fn pipeline(llm: MockLlm, index: MockIndex) -> ChatPipeline {
        ChatPipeline::new(Arc::new(llm), Arc::new(index))
    }

    #[tokio::test]
    async fn test_empty_conversation_is_a_request_error() {
        let p = pipeline(MockLlm::completing("unused"), MockIndex::returning(vec![]));

        let err = p.run(&[], &ChatFilters::default(), false).await.unwrap_err();
        assert!(matches!(err, AppError::RequestDecode(_)));
    }

    #[tokio::test]
    async fn test_retrieval_failure_propagates() {
        let p = pipeline(MockLlm::completing("unused"), MockIndex::failing());
        let messages = vec![ChatMessage::user("what happened?")];

        let err = p
            .run(&messages, &ChatFilters::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_reasoning_flag_selects_reasoner_model() {
        let llm = MockLlm::completing("unused");
        let index = MockIndex::returning(vec![hit("a1", "mintpress", "T")]);
        let p = ChatPipeline::new(Arc::new(llm), Arc::new(index));
        let messages = vec![ChatMessage::user("question")];

        let outcome = p.run(&messages, &ChatFilters::default(), true).await.unwrap();
        assert_eq!(outcome.model, ChatModel::Reasoner);
    }

    #[tokio::test]
    async fn test_answer_request_streams_with_selected_model() {
        let llm = Arc::new(
            MockLlm::completing("unused").with_stream_chunks(&["Hello ", "world"]),
        );
        let index = Arc::new(MockIndex::returning(vec![hit("a1", "mintpress", "T")]));
        let p = ChatPipeline::new(llm.clone(), index);
        let messages = vec![ChatMessage::user("question")];

        let outcome = p.run(&messages, &ChatFilters::default(), false).await.unwrap();

        let answer = collect_stream(outcome.stream).await.unwrap();
        assert_eq!(answer, "Hello world");

        let request = llm.last_stream_request().unwrap();
        assert_eq!(request.model, "deepseek-chat");
        assert!(request.stream);
    }

    #[tokio::test]
    async fn test_outcome_debug_summarizes_without_the_stream() {
        let llm = MockLlm::completing("unused");
        let index = MockIndex::returning(vec![hit("a1", "mintpress", "T")]);
        let p = pipeline(llm, index);
        let messages = vec![ChatMessage::user("question")];

        let outcome = p.run(&messages, &ChatFilters::default(), false).await.unwrap();

        let rendered = format!("{:?}", outcome);
        assert!(rendered.contains("sources: 1"));
        assert!(rendered.contains("model: Chat"));
        assert!(rendered.contains("<chunk stream>"));
    }

    #[tokio::test]
    async fn test_sources_carried_through_in_retrieval_order() {
        let llm = MockLlm::completing("unused");
        let index = MockIndex::returning(vec![
            hit("a1", "mintpress", "First"),
            hit("a2", "grayzone", "Second"),
        ]);
        let p = pipeline(llm, index);
        let messages = vec![ChatMessage::user("question")];

        let outcome = p.run(&messages, &ChatFilters::default(), false).await.unwrap();

        let ids: Vec<_> = outcome.sources.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_multi_turn_conversation_end_to_end() {
        let llm = Arc::new(MockLlm::completing(
            r#"{"query": "latest developments in large language models AI"}"#,
        ));
        let index = Arc::new(MockIndex::returning(vec![hit(
            "a1",
            "mintpress",
            "LLM coverage",
        )]));
        let p = ChatPipeline::new(llm.clone(), index.clone());

        let messages = vec![
            ChatMessage::user("I want to know about the latest developments in AI."),
            ChatMessage::assistant("Are you interested in large language models?"),
            ChatMessage::user("Tell me about large language models."),
        ];
        let filters = ChatFilters {
            publications: vec!["mintpress".to_string()],
            date_range: None,
        };

        let outcome = p.run(&messages, &filters, false).await.unwrap();

        // Exactly one auxiliary completion for contextualization.
        assert_eq!(llm.complete_calls(), 1);

        assert_eq!(index.search_calls(), 1);
        let search = index.last_search().unwrap();
        assert_eq!(search.query, "latest developments in large language models AI");
        assert_eq!(search.filter, json!({"publication": "mintpress"}));
        assert_eq!(search.top_k, TOP_K);

        // The grounding system message sits just before the question.
        let request = llm.last_stream_request().unwrap();
        assert_eq!(request.messages.len(), 4);
        let grounding = &request.messages[2];
        assert_eq!(grounding.role, Role::System);
        assert!(grounding.content.contains(CITATION_GUIDELINES));
        assert!(grounding.content.contains("Publication: MintPress"));
        assert!(grounding
            .content
            .contains("Question: Tell me about large language models."));
        assert_eq!(
            request.messages[3].content,
            "Tell me about large language models."
        );

        assert!(outcome.sources.len() <= TOP_K);
        assert_eq!(outcome.sources[0].title, "LLM coverage");
    }
}
