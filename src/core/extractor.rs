//! Locates a JSON payload inside free-form generator output.
//!
//! Strategies run in a fixed order and the first one that yields a parsed
//! value wins:
//!
//! 1. the whole text as JSON (with doubled escapes collapsed when that still parses)
//! 2. a ```` ```json ```` fenced block
//! 3. a bare ```` ``` ```` fenced block
//! 4. the whole text with control characters stripped
//!
//! A fenced block that is found but cannot be repaired into JSON is a hard
//! failure; later strategies are not tried.

use crate::core::sanitizer;
use crate::utils::error::{CourseError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```\s*json\s*\n?([\s\S]*?)\n?\s*```").expect("json fence pattern")
});

static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*\n?([\s\S]*?)\n?\s*```").expect("bare fence pattern"));

const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    JsonFence,
    BareFence,
    ControlStripped,
}

#[derive(Debug, Clone, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the payload as canonical JSON text.
    pub fn extract(&self, raw: &str) -> Result<String> {
        let value = self.extract_value(raw)?;
        Ok(serde_json::to_string(&value)?)
    }

    pub fn extract_value(&self, raw: &str) -> Result<Value> {
        self.extract_with_strategy(raw).map(|(value, _)| value)
    }

    pub fn extract_with_strategy(&self, raw: &str) -> Result<(Value, Strategy)> {
        if let Some(value) = parse_direct(raw) {
            tracing::debug!(strategy = "direct", "Parsed response as JSON");
            return Ok((value, Strategy::Direct));
        }

        for (fence, strategy) in [
            (&*JSON_FENCE, Strategy::JsonFence),
            (&*BARE_FENCE, Strategy::BareFence),
        ] {
            if let Some(caps) = fence.captures(raw) {
                let interior = caps.get(1).map_or("", |m| m.as_str());
                tracing::debug!(
                    strategy = ?strategy,
                    block_len = interior.len(),
                    "Found fenced block"
                );
                return parse_block(interior).map(|value| (value, strategy));
            }
        }

        tracing::debug!("No fenced block found, retrying without control characters");
        let stripped = sanitizer::strip_control_chars(raw);
        if let Ok(value) = serde_json::from_str::<Value>(stripped.trim()) {
            return Ok((value, Strategy::ControlStripped));
        }

        Err(CourseError::Extraction {
            reason: "no JSON payload found".to_string(),
            snippet: Some(snippet(raw)),
        })
    }
}

fn parse_direct(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    let value = serde_json::from_str::<Value>(trimmed).ok()?;

    // Wrappers carry escaped payload text that must stay as-is for the next pass.
    let wrapped = value.get("output").is_some()
        || value.get(0).and_then(|first| first.get("output")).is_some();
    if !wrapped {
        let collapsed = sanitizer::collapse_double_escapes(trimmed);
        if collapsed != trimmed {
            if let Ok(repaired) = serde_json::from_str::<Value>(&collapsed) {
                return Some(repaired);
            }
        }
    }
    Some(value)
}

fn parse_block(interior: &str) -> Result<Value> {
    let repaired = sanitizer::repair_candidate(interior);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        return Ok(value);
    }

    // Unescaping can break blocks that were already valid JSON with escaped quotes.
    if let Ok(value) = serde_json::from_str::<Value>(interior.trim()) {
        tracing::debug!("Repaired block failed to parse, untouched block succeeded");
        return Ok(value);
    }

    tracing::warn!(snippet = %snippet(&repaired), "Fenced block is not valid JSON");
    Err(CourseError::Extraction {
        reason: "malformed JSON".to_string(),
        snippet: Some(snippet(&repaired)),
    })
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
