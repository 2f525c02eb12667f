//! Fixed system prompts that pin the reply language of the model.

const PROMPT_RU: &str = "Отвечай на русском языке.";
const PROMPT_EN: &str = "Respond in English.";
const PROMPT_ES: &str = "Responde en español.";
const PROMPT_PT: &str = "Responda em português.";
const PROMPT_FR: &str = "Répondez en français.";
const PROMPT_PT_BR: &str = "Responda em português brasileiro.";

/// Look up the system prompt for a client language code.
///
/// Unknown codes fall back to the Russian prompt, the product default; an
/// absent `language` field takes the same path via its serde default.
pub fn language_prompt(code: &str) -> &'static str {
    match code {
        "ru" => PROMPT_RU,
        "en" => PROMPT_EN,
        "es" => PROMPT_ES,
        "pt" => PROMPT_PT,
        "fr" => PROMPT_FR,
        "pt-BR" => PROMPT_PT_BR,
        _ => PROMPT_RU,
    }
}
