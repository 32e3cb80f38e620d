use std::collections::HashMap;
use std::path::Path;

use crate::directive::DEFAULT_SENTINEL;
use crate::error::Error;
use crate::language::{Language, LanguageTable, RendererKind};

/// Project configuration loaded from `.docweave.toml`.
/// Command-line flags override every value here.
#[derive(Debug)]
pub struct Config {
    /// Directive sentinel recognised in documents.
    pub directive: String,
    /// Built-in languages, with configured ones ahead of them.
    pub languages: LanguageTable,
    /// Markup used when no renderer is given on the command line.
    pub renderer: RendererKind,
    /// Whether unused chunks are reported after a weave.
    pub warn_unused: bool,
}

/// Raw TOML structure for `.docweave.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DocweaveTomlConfig {
    #[serde(default)]
    directive: Option<String>,
    #[serde(default)]
    languages: Vec<LanguageEntry>,
    #[serde(default)]
    renderer: Option<RendererKind>,
    #[serde(default)]
    warn_unused: Option<bool>,
}

/// One `[[languages]]` table.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LanguageEntry {
    /// Comment leader, e.g. `--`.
    comment: String,
    /// Fence info string for markdown output.
    markdown: Option<String>,
    /// Regex matched against source paths.
    #[serde(rename = "match")]
    match_rule: String,
    /// Language name, also the fallback display name.
    name: String,
    /// Minted lexer for tex output.
    tex: Option<String>,
}

impl Config {
    /// Load config from `.docweave.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config file the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::InvalidMatchRule` if a language match rule doesn't compile.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".docweave.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Build a config from TOML text. Empty text yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` or `Error::InvalidMatchRule`.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DocweaveTomlConfig = toml::from_str(content)?;

        let mut languages = LanguageTable::builtin()?;
        // Later entries go first so the file's own order decides ties.
        for entry in raw.languages.into_iter().rev() {
            languages.prepend(entry.into_language()?);
        }

        return Ok(Self {
            directive: raw.directive.unwrap_or_else(|| return DEFAULT_SENTINEL.to_string()),
            languages,
            renderer: raw.renderer.unwrap_or(RendererKind::Tex),
            warn_unused: raw.warn_unused.unwrap_or(true),
        });
    }
}

impl LanguageEntry {
    /// Compile into a descriptor.
    fn into_language(self) -> Result<Language, Error> {
        let mut names = HashMap::new();
        if let Some(tex) = self.tex {
            names.insert(RendererKind::Tex, tex);
        }
        if let Some(markdown) = self.markdown {
            names.insert(RendererKind::Markdown, markdown);
        }
        return Language::new(&self.name, &self.match_rule, &self.comment, names);
    }
}
