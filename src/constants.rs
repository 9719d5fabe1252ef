//! Centralized constants for papertrail.
//!
//! All magic numbers, default strings, and prompt texts live here so they can
//! be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "papertrail";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "papertrail.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "ollama";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.1:8b";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Anthropic.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-6";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default LLM model identifier for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "arcee-ai/trinity-large-preview:free";

/// Maximum tokens for hosted LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Request timeout for the Ollama HTTP client, in seconds.
pub const OLLAMA_TIMEOUT_SECS: u64 = 600;

// --- Agent loop ---

/// Default ceiling on tool-calling rounds per turn. Zero disables the ceiling.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

/// Number of closing braces the normalizer appends to repair truncated output.
pub const MAX_BRACE_REPAIRS: usize = 5;

/// Seed system message for every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a research assistant. When you need to call a tool \
(e.g., to retrieve research papers, summarize a paper, compare papers, or analyze citations), \
output a JSON object with a key 'tool_calls' that includes the function name and arguments. \
Do not include any extra text or formatting.";

/// Finalize instruction for single-shot `ask`.
pub const FINAL_ANSWER_INSTRUCTION: &str = "Based on all the information gathered so far, \
please now generate a final, polished answer to the original question in plain text. \
The answer should be concise, well-organized, and visually appealing, without any internal \
processing details.";

/// Finalize instruction for interactive `chat` turns.
pub const CONVERSATIONAL_ANSWER_INSTRUCTION: &str = "Based on everything so far, please now \
provide a final, conversational answer to the original question. The answer should be clear, \
engaging, and free of any internal processing details.";

/// Shown in interactive mode when the model produces an empty answer.
pub const EMPTY_ANSWER_FALLBACK: &str =
    "I'm sorry, I didn't quite catch that. Could you please rephrase?";

/// Words that end an interactive session.
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit"];

// --- Retrieval ---

/// Default directory holding research papers.
pub const DEFAULT_PAPERS_DIR: &str = "research_papers";

/// Default chunk size (characters) for the paper index.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap (characters) between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Default number of chunks returned per search.
pub const DEFAULT_TOP_K: usize = 4;

/// File extensions the paper index loads.
pub const PAPER_EXTENSIONS: &[&str] = &["txt", "md"];

// --- Token counting ---

/// Approximate token overhead per message (role markers, etc.).
pub const TOKENS_PER_MESSAGE_OVERHEAD: usize = 4;

/// Approximate token overhead for conversation framing.
pub const TOKENS_CONVERSATION_FRAMING: usize = 2;

/// Default context window size for models not in the registry.
pub const DEFAULT_CONTEXT_WINDOW: usize = 8_192;
