// Model mapping - resolves client-facing aliases to NIM model identifiers

use indexmap::IndexMap;

/// Upstream model used when the requested alias is not in the table
pub const DEFAULT_NIM_MODEL: &str = "meta/llama-3.1-8b-instruct";

/// Built-in aliases, in the order they are listed by `/v1/models`
static BUILTIN_MAPPING: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "nvidia/llama-3.1-nemotron-ultra-253b-v1"),
    ("gpt-4", "qwen/qwen3-coder-480b-a35b-instruct"),
    ("gpt-4-turbo", "moonshotai/kimi-k2-instruct-0905"),
    ("gpt-4o", "deepseek-ai/deepseek-v3.1"),
    ("claude-3-opus", "openai/gpt-oss-120b"),
    ("claude-3-sonnet", "openai/gpt-oss-20b"),
    ("gemini-pro", "qwen/qwen3-next-80b-a3b-thinking"),
];

/// Immutable alias table with a fallback. Lookups never fail.
#[derive(Debug, Clone)]
pub struct ModelMapping {
    aliases: IndexMap<String, String>,
    fallback: String,
}

impl ModelMapping {
    pub fn new(aliases: IndexMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            aliases,
            fallback: fallback.into(),
        }
    }

    pub fn builtin_aliases() -> IndexMap<String, String> {
        BUILTIN_MAPPING
            .iter()
            .map(|(alias, model)| (alias.to_string(), model.to_string()))
            .collect()
    }

    /// Resolve an alias to its upstream identifier, or the fallback when the
    /// alias is unknown or missing.
    pub fn resolve(&self, alias: Option<&str>) -> &str {
        alias
            .and_then(|a| self.aliases.get(a))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for ModelMapping {
    fn default() -> Self {
        Self::new(Self::builtin_aliases(), DEFAULT_NIM_MODEL)
    }
}
