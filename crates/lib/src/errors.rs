use thiserror::Error;

/// Custom error types for the AI transports (chat completion and embeddings).
///
/// Every module that talks to a model endpoint shares this error so that
/// transport failures look the same whether they come from the article
/// synthesizer, the answer engine, or the index rebuild.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI API: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI API response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI API returned an error: {0}")]
    AiApi(String),
}
