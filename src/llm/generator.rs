//! Roadmap generation through a completion model.
//!
//! Pipeline:
//! 1. Ask for a roadmap as a single JSON node
//! 2. Decode permissively and validate against the node schema
//! 3. On failure, one repair round-trip quoting the bad output
//! 4. On failure again, give up; the caller falls back to the local generator

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ChatMessage, CompletionClient, DecodeError, LlmError, decode_roadmap};
use crate::tree::Node;

const SYSTEM_PROMPT: &str = "You return learning roadmaps as JSON and nothing else. \
The JSON root is a node object with fields: id (string), label (string), \
description (optional string), resources (array of objects with string title and url) \
and children (array of nodes of the same shape). Output valid JSON only.";

const REPAIR_PROMPT: &str = "The response above could not be parsed as JSON matching the node schema. \
Return only one valid JSON object with the fields id, label, description (optional), \
resources[] and children[]. No explanation, no markdown.";

/// Repair attempts after the first answer fails to decode.
const MAX_REPAIRS: usize = 1;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model output unusable after {attempts} attempts: {last}")]
    Undecodable { attempts: usize, last: DecodeError },
}

#[derive(Clone)]
pub struct RoadmapGenerator {
    client: Arc<dyn CompletionClient>,
}

impl std::fmt::Debug for RoadmapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapGenerator")
            .field("model", &self.client.model_name())
            .finish()
    }
}

impl RoadmapGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub async fn generate(&self, topic: &str, level: &str) -> Result<Node, GenerateError> {
        let user = format!(
            "Generate a concise learning roadmap for the topic \"{}\" at level \"{}\". \
             Use at most 3 top-level branches with at most 3 children each. \
             Return only the JSON object.",
            topic, level
        );

        let mut output = self
            .client
            .complete(&[ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)])
            .await?;

        let mut attempts = 1;
        loop {
            match decode_roadmap(&output) {
                Ok(root) => {
                    info!(topic, attempts, model = self.client.model_name(), "roadmap generated");
                    return Ok(root);
                }
                Err(e) if attempts > MAX_REPAIRS => {
                    warn!(topic, error = %e, "giving up on model output");
                    return Err(GenerateError::Undecodable { attempts, last: e });
                }
                Err(e) => {
                    debug!(topic, error = %e, "model output rejected, asking for a repair");
                    let repair = format!("{}\n\n{}", output, REPAIR_PROMPT);
                    output = self
                        .client
                        .complete(&[ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(repair)])
                        .await?;
                    attempts += 1;
                }
            }
        }
    }
}
