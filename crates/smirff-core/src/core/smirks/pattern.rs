use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmirksError {
    #[error("SMIRKS pattern is empty")]
    Empty,
    #[error("Unbalanced '{symbol}' at position {position} in SMIRKS '{pattern}'")]
    Unbalanced {
        pattern: String,
        symbol: char,
        position: usize,
    },
    #[error("Invalid atom tag ':{tag}' in SMIRKS '{pattern}'")]
    InvalidTag { pattern: String, tag: String },
    #[error("Atom tag :{tag} appears more than once in SMIRKS '{pattern}'")]
    DuplicateTag { pattern: String, tag: usize },
    #[error("Atom tags {tags:?} in SMIRKS '{pattern}' are not numbered contiguously from 1")]
    NonContiguousTags { pattern: String, tags: Vec<usize> },
}

/// A syntactically checked SMIRKS pattern.
///
/// Only the structure the assignment engine depends on is verified here: balanced
/// bracket atoms and branches, and tagged atoms numbered `:1..:N` without gaps.
/// Chemical semantics of the pattern are the matcher's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmirksPattern {
    text: String,
    tags: usize,
}

impl SmirksPattern {
    pub fn parse(text: &str) -> Result<Self, SmirksError> {
        if text.trim().is_empty() {
            return Err(SmirksError::Empty);
        }

        let unbalanced = |symbol: char, position: usize| SmirksError::Unbalanced {
            pattern: text.to_string(),
            symbol,
            position,
        };

        let mut bracket_depth = 0usize;
        let mut paren_depth = 0usize;
        let mut atom_start = 0usize;
        let mut tags = Vec::new();

        for (position, c) in text.char_indices() {
            match c {
                '[' => {
                    if bracket_depth == 0 {
                        atom_start = position + 1;
                    }
                    bracket_depth += 1;
                }
                ']' => {
                    if bracket_depth == 0 {
                        return Err(unbalanced(']', position));
                    }
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        if let Some(tag) = Self::trailing_tag(text, &text[atom_start..position])? {
                            tags.push(tag);
                        }
                    }
                }
                '(' => paren_depth += 1,
                ')' => {
                    if paren_depth == 0 {
                        return Err(unbalanced(')', position));
                    }
                    paren_depth -= 1;
                }
                _ => {}
            }
        }
        if bracket_depth != 0 {
            return Err(unbalanced('[', text.len()));
        }
        if paren_depth != 0 {
            return Err(unbalanced('(', text.len()));
        }

        let mut sorted = tags.clone();
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            if pair[0] == pair[1] {
                return Err(SmirksError::DuplicateTag {
                    pattern: text.to_string(),
                    tag: pair[0],
                });
            }
        }
        if sorted.iter().enumerate().any(|(i, &tag)| tag != i + 1) {
            return Err(SmirksError::NonContiguousTags {
                pattern: text.to_string(),
                tags,
            });
        }

        Ok(Self {
            text: text.to_string(),
            tags: sorted.len(),
        })
    }

    /// Extracts the `:N` map index ending a bracket atom's body, if present.
    fn trailing_tag(pattern: &str, body: &str) -> Result<Option<usize>, SmirksError> {
        let digits_start = body.len()
            - body
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .count();
        if !body[..digits_start].ends_with(':') {
            return Ok(None);
        }
        let digits = &body[digits_start..];
        if digits.is_empty() {
            return Err(SmirksError::InvalidTag {
                pattern: pattern.to_string(),
                tag: String::new(),
            });
        }
        match digits.parse::<usize>() {
            Ok(0) | Err(_) => Err(SmirksError::InvalidTag {
                pattern: pattern.to_string(),
                tag: digits.to_string(),
            }),
            Ok(tag) => Ok(Some(tag)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of tagged atoms (`:1` .. `:N`).
    pub fn tagged_atoms(&self) -> usize {
        self.tags
    }
}

impl fmt::Display for SmirksPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
