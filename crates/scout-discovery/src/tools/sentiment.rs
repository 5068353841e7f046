//! Tool for scoring a single headline or post

use super::parse_params;
use crate::sentiment::{SentimentLabel, SentimentLexicon};
use crate::symbols::SymbolExtractor;
use async_trait::async_trait;
use scout_tools::{Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool that scores text with the keyword lexicon
#[derive(Debug, Clone, Default)]
pub struct HeadlineSentimentTool {
    lexicon: SentimentLexicon,
    extractor: SymbolExtractor,
}

#[derive(Debug, Deserialize)]
struct SentimentParams {
    text: String,
}

impl HeadlineSentimentTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(mut self, lexicon: SentimentLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }
}

#[async_trait]
impl Tool for HeadlineSentimentTool {
    async fn execute(&self, params: Value) -> scout_tools::Result<Value> {
        let params: SentimentParams = parse_params(params)?;
        if params.text.trim().is_empty() {
            return Err(ToolError::InvalidParameters("text must not be empty".to_string()));
        }

        let score = self.lexicon.score(&params.text);
        let symbols: Vec<String> = self
            .extractor
            .extract(&params.text)
            .into_iter()
            .map(String::from)
            .collect();

        Ok(json!({
            "score": score,
            "label": SentimentLabel::from_score(score).name(),
            "keywords": self.lexicon.counts(&params.text),
            "symbols": symbols,
        }))
    }

    fn name(&self) -> &str {
        "headline_sentiment"
    }

    fn description(&self) -> &str {
        "Score a headline or post between -1 (bearish) and 1 (bullish) using a keyword \
         lexicon, and list the ticker symbols it mentions."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Headline or post text"
                }
            },
            "required": ["text"]
        })
    }
}
