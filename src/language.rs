/// Language descriptors: which files a language covers, how it comments,
/// and what each renderer calls it.
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;

use crate::error::Error;

/// Output markup selected for a weave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Flat markdown: table header plus fenced code.
    Markdown,
    /// LaTeX with minted listings and cross-reference labels.
    Tex,
}

/// Immutable description of one source language. Shared by every chunk
/// parsed under it.
#[derive(Debug)]
pub struct Language {
    /// Line-comment leader that introduces markers, e.g. `//`.
    pub comment_leader: String,
    /// Per-renderer language names (minted lexer, fence info string).
    pub display_names: HashMap<RendererKind, String>,
    /// Rule matched against the source file path.
    pub match_rule: Regex,
    /// Human-readable language name.
    pub name: String,
}

impl Language {
    /// Build a descriptor, compiling its match rule.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMatchRule` if `pattern` is not a valid regex.
    pub fn new(
        name: &str,
        pattern: &str,
        comment_leader: &str,
        display_names: HashMap<RendererKind, String>,
    ) -> Result<Self, Error> {
        let match_rule = Regex::new(pattern).map_err(|e| {
            return Error::InvalidMatchRule {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            };
        })?;
        return Ok(Self {
            comment_leader: comment_leader.trim_end().to_string(),
            display_names,
            match_rule,
            name: name.to_string(),
        });
    }

    /// Name of this language for the given renderer, falling back to `name`.
    pub fn display_name(&self, kind: RendererKind) -> &str {
        return self.display_names.get(&kind).map_or(self.name.as_str(), String::as_str);
    }

    /// Whether this descriptor covers the given path.
    pub fn matches(&self, path: &Path) -> bool {
        return self.match_rule.is_match(&path.to_string_lossy());
    }
}

/// Ordered descriptor table. The first matching descriptor wins.
#[derive(Debug, Default)]
pub struct LanguageTable {
    /// Descriptors in lookup order.
    languages: Vec<Arc<Language>>,
}

impl LanguageTable {
    /// Table holding the built-in languages.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMatchRule` only if a built-in rule is malformed.
    pub fn builtin() -> Result<Self, Error> {
        let mut table = Self::default();
        for &(name, pattern, leader, minted, fence) in BUILTIN {
            let names = HashMap::from([
                (RendererKind::Markdown, fence.to_string()),
                (RendererKind::Tex, minted.to_string()),
            ]);
            table.push(Language::new(name, pattern, leader, names)?);
        }
        return Ok(table);
    }

    /// Find the descriptor for a source file.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoLanguage` when no descriptor matches.
    pub fn for_path(&self, path: &Path) -> Result<Arc<Language>, Error> {
        return self
            .languages
            .iter()
            .find(|l| return l.matches(path))
            .cloned()
            .ok_or_else(|| {
                return Error::NoLanguage {
                    file: path.to_path_buf(),
                };
            });
    }

    /// Put a descriptor ahead of every existing one.
    pub fn prepend(&mut self, language: Language) {
        self.languages.insert(0, Arc::new(language));
    }

    /// Append a descriptor after every existing one.
    pub fn push(&mut self, language: Language) {
        self.languages.push(Arc::new(language));
    }
}

/// Built-in languages: name, match rule, comment leader, minted lexer, fence info string.
const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    ("rust", r"\.rs$", "//", "rust", "rust"),
    ("go", r"\.go$", "//", "go", "go"),
    ("c", r"\.(c|h|cc|cpp|hpp)$", "//", "cpp", "cpp"),
    ("javascript", r"\.(js|jsx|ts|tsx)$", "//", "typescript", "typescript"),
    ("python", r"\.py$", "#", "python", "python"),
    ("shell", r"\.(sh|bash)$", "#", "bash", "sh"),
    ("haskell", r"\.hs$", "--", "haskell", "haskell"),
    ("toml", r"\.toml$", "#", "toml", "toml"),
];
