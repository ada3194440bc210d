use rig::{agent::Agent, client::CompletionClient, providers::openrouter};

use crate::llm::ModelProfile;

pub fn get_llm_agent(
    api_key: &str,
    prompt: &str,
    profile: &ModelProfile,
) -> Agent<openrouter::CompletionModel> {
    let client = openrouter::Client::new(api_key);
    client
        .agent(&profile.model)
        .preamble(prompt)
        .temperature(profile.temperature)
        .max_tokens(profile.max_tokens)
        .build()
}
