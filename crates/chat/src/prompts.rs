//! Fixed prompt templates for the chat pipeline.
//!
//! The grounding template is rendered with Handlebars; the
//! contextualizer prompts are plain strings. These texts are part of
//! the product behavior. Change them deliberately.

/// System instruction for the auxiliary query-contextualization call.
///
/// The model must answer with a JSON object holding a single "query"
/// key; the response is parsed strictly against that schema.
pub const CONTEXTUAL_QUERY_SYSTEM_PROMPT: &str = r#"You will be provided with a conversation history. Your task is to generate a search query based on this history. You must output the query in a JSON format, with a single key "query".

EXAMPLE CONVERSATION:
user: I want to know about the latest developments in AI.
assistant: Sure, there have been many recent breakthroughs. Are you interested in large language models, computer vision, or something else?
user: Tell me about large language models.

EXAMPLE JSON OUTPUT:
{
    "query": "latest developments in large language models AI"
}"#;

/// Grounding instruction template wrapping the retrieved context.
///
/// Rendered with `context` (the formatted source blocks) and `question`
/// (the final user message).
pub const GROUNDING_PROMPT_TEMPLATE: &str = r#"Answer the following question using ONLY the provided sources. Pay close attention to the date of each source to understand the context of the information.

<sources>
{{context}}
</sources>

When you answer, you MUST follow these guidelines:
1. For every factual claim you make, you must cite the source.
2. To cite a source, include the publication and title in parentheses at the end of the sentence, like this: (The Grayzone, The West's phantom 'moral majority' is a marketing tool for war).
3. If you are quoting directly from a source, enclose the quote in double quotation marks and add the citation, like this: "Direct quote from the article." (MintPress, How America's 'Radical' Foreign Policy Is Paving the Way for a Multipolar World).
4. Do not makeup information or use external knowledge.

Question: {{question}}"#;

/// The guideline block of the grounding template, verbatim.
///
/// Exposed so tests can assert the citation instructions survive
/// template rendering unchanged.
pub const CITATION_GUIDELINES: &str = r#"When you answer, you MUST follow these guidelines:
1. For every factual claim you make, you must cite the source.
2. To cite a source, include the publication and title in parentheses at the end of the sentence, like this: (The Grayzone, The West's phantom 'moral majority' is a marketing tool for war).
3. If you are quoting directly from a source, enclose the quote in double quotation marks and add the citation, like this: "Direct quote from the article." (MintPress, How America's 'Radical' Foreign Policy Is Paving the Way for a Multipolar World).
4. Do not makeup information or use external knowledge."#;
