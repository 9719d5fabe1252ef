//! Local paper index behind the search tool.
//!
//! [`PaperIndex`] loads `.txt` and `.md` files from a papers directory,
//! splits them into overlapping character chunks, and ranks chunks by how
//! often the query's terms occur in them. The index is rebuilt on every
//! search so papers dropped into the directory mid-session are picked up.
//!
//! Failures never escape [`Retriever::search`]: they are rendered as a
//! `Retriever error: ...` string that the model reads like any other result.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::Config;
use crate::constants::PAPER_EXTENSIONS;

/// Text search over some document store.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str) -> String;
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Directory {} does not exist.", .0.display())]
    MissingDirectory(PathBuf),

    #[error("No research papers loaded for retrieval.")]
    NoDocuments,

    #[error("invalid papers path: {0}")]
    Pattern(#[from] glob::PatternError),
}

static TERM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Query words too common to say anything about relevance.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "about", "from", "into", "that", "this", "what", "which",
    "are", "was", "were", "how", "why", "papers", "paper",
];

pub struct PaperIndex {
    dir: PathBuf,
    chunk_size: usize,
    chunk_overlap: usize,
    top_k: usize,
}

struct Chunk {
    source: String,
    text: String,
}

impl PaperIndex {
    pub fn new(dir: impl Into<PathBuf>, chunk_size: usize, chunk_overlap: usize, top_k: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            dir: dir.into(),
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            top_k: top_k.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.papers_dir(),
            config.chunk_size(),
            config.chunk_overlap(),
            config.top_k(),
        )
    }

    /// Loads every supported paper under the directory, sorted by path.
    fn load_documents(&self) -> Result<Vec<(String, String)>, RetrievalError> {
        if !self.dir.is_dir() {
            return Err(RetrievalError::MissingDirectory(self.dir.clone()));
        }

        let pattern = self.dir.join("**").join("*");
        let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            if !has_paper_extension(&path) {
                tracing::debug!(path = %path.display(), "unsupported file format, skipping");
                continue;
            }
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable paper, skipping");
                    continue;
                }
            };
            let source = path
                .strip_prefix(&self.dir)
                .unwrap_or(&path)
                .display()
                .to_string();
            documents.push((source, text));
        }

        if documents.is_empty() {
            return Err(RetrievalError::NoDocuments);
        }
        Ok(documents)
    }

    /// Splits text into windows of `chunk_size` characters, each starting
    /// `chunk_size - chunk_overlap` characters after the previous one.
    fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }

    fn try_search(&self, query: &str) -> Result<String, RetrievalError> {
        let documents = self.load_documents()?;
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|(source, text)| {
                self.split(text).into_iter().map(move |text| Chunk {
                    source: source.clone(),
                    text,
                })
            })
            .collect();

        let terms = query_terms(query);
        let mut scored: Vec<(usize, &Chunk)> = chunks
            .iter()
            .map(|chunk| (score(&chunk.text, &terms), chunk))
            .filter(|(score, _)| *score > 0)
            .collect();
        // Stable sort keeps document order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        tracing::debug!(query, chunks = chunks.len(), hits = scored.len(), "searched papers");

        if scored.is_empty() {
            return Ok(format!("No passages matched \"{query}\"."));
        }

        Ok(scored
            .into_iter()
            .take(self.top_k)
            .map(|(_, chunk)| format!("[{}]\n{}", chunk.source, chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

impl Retriever for PaperIndex {
    fn search(&self, query: &str) -> String {
        match self.try_search(query) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "retrieval failed");
                format!("Retriever error: {e}")
            }
        }
    }
}

fn has_paper_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PAPER_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lowercased, de-duplicated query words worth matching on.
fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for m in TERM_RE.find_iter(query) {
        let term = m.as_str().to_lowercase();
        if term.chars().count() < 3 || STOPWORDS.contains(&term.as_str()) {
            continue;
        }
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Total occurrences of the terms among the chunk's words.
fn score(text: &str, terms: &[String]) -> usize {
    TERM_RE
        .find_iter(text)
        .filter(|m| {
            let word = m.as_str().to_lowercase();
            terms.iter().any(|t| *t == word)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(dir: &Path) -> PaperIndex {
        PaperIndex::new(dir, 500, 100, 2)
    }

    #[test]
    fn test_missing_directory_is_reported_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let result = index(&dir.path().join("nope")).search("quantum");
        assert!(result.starts_with("Retriever error: Directory"));
        assert!(result.contains("does not exist"));
    }

    #[test]
    fn test_empty_directory_is_reported_as_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("figure.png"), [0u8, 1, 2]).unwrap();
        let result = index(dir.path()).search("quantum");
        assert_eq!(result, "Retriever error: No research papers loaded for retrieval.");
    }

    #[test]
    fn test_ranks_matching_chunks_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("qc.txt"),
            "Quantum computing uses qubits. Quantum error correction protects quantum state.",
        )
        .unwrap();
        std::fs::write(dir.path().join("bio.md"), "Protein folding and enzymes.").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested").join("more.txt"),
            "A short note on quantum annealing.",
        )
        .unwrap();

        let result = index(dir.path()).search("quantum computing papers");
        let first = result.split("\n\n").next().unwrap();
        assert!(first.starts_with("[qc.txt]"));
        assert!(result.contains("annealing"));
        assert!(!result.contains("Protein"));
    }

    #[test]
    fn test_unreadable_paper_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.txt"), [0xffu8, 0xfe, b'q', 0x80]).unwrap();
        std::fs::write(dir.path().join("qc.md"), "Quantum teleportation of qubits.").unwrap();

        let result = index(dir.path()).search("quantum");
        assert!(result.starts_with("[qc.md]"), "{result}");
        assert!(!result.contains("broken.txt"));
    }

    #[test]
    fn test_no_match_message() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Nothing relevant here.").unwrap();
        let result = index(dir.path()).search("graphene");
        assert_eq!(result, "No passages matched \"graphene\".");
    }

    #[test]
    fn test_split_overlaps_windows() {
        let index = PaperIndex::new(".", 10, 4, 1);
        let chunks = index.split("abcdefghijklmnopqrst");
        assert_eq!(chunks, vec!["abcdefghij", "ghijklmnop", "mnopqrst"]);
    }

    #[test]
    fn test_query_terms_drop_short_and_common_words() {
        assert_eq!(
            query_terms("Summarize the quantum computing papers on AI"),
            vec!["summarize", "quantum", "computing"]
        );
    }
}
