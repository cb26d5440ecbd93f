//! Minimal INI reader for resource descriptors.
//!
//! Supported: `[section]` headers, `key = value` lines, full line comments starting with
//! `;` or `#` and blank lines. Keys are case-insensitive, values are trimmed. Lines before
//! the first header belong to the unnamed section `""`.

use snafu::{Snafu, ensure};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum IniError {
    #[snafu(display("Line {line}: section header is not closed"))]
    UnterminatedSection { line: usize },

    #[snafu(display("Line {line}: expected `key = value`, found `{text}`"))]
    MalformedLine { line: usize, text: String },

    #[snafu(display("Line {line}: empty key"))]
    EmptyKey { line: usize },

    #[snafu(display("Missing [{section}] section"))]
    MissingSection { section: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut doc = IniDocument::default();
        let mut current = String::new();

        for (number, raw) in text.lines().enumerate() {
            let line = number + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return UnterminatedSectionSnafu { line }.fail();
                };
                current = name.trim().to_ascii_lowercase();
                doc.section_mut(&current);
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                return MalformedLineSnafu {
                    line,
                    text: trimmed,
                }
                .fail();
            };

            let key = key.trim();
            ensure!(!key.is_empty(), EmptyKeySnafu { line });

            doc.section_mut(&current)
                .push((key.to_ascii_lowercase(), value.trim().to_string()));
        }

        Ok(doc)
    }

    fn section_mut(&mut self, name: &str) -> &mut Vec<(String, String)> {
        let pos = match self.sections.iter().position(|(n, _)| n == name) {
            Some(pos) => pos,
            None => {
                self.sections.push((name.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos].1
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|(n, _)| n == name)
    }

    /// Entries of `name` in file order. A section that appears twice is merged.
    pub fn section(&self, name: &str) -> Result<&[(String, String)], IniError> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries.as_slice())
            .ok_or_else(|| IniError::MissingSection {
                section: name.to_string(),
            })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .ok()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
