//! Placeholder templates and their inverse
//!
//! Templates use curly-brace placeholders such as
//! `https://github.com/user/repo/compare/{previous_tag}..{tag}`. Doubled
//! braces (`{{`, `}}`) stand for literal braces. Besides forward substitution,
//! a template can be reversed: given a string previously produced from it,
//! recover the value of every placeholder.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::error::TemplateError;

static FIELD_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed placeholder template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template, rejecting placeholders that are not identifiers
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnbalancedBrace {
                            template: source.to_string(),
                            brace: '{',
                        });
                    }
                    if !FIELD_NAME_REGEX.is_match(&name) {
                        return Err(TemplateError::InvalidField {
                            template: source.to_string(),
                            field: name,
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => {
                    return Err(TemplateError::UnbalancedBrace {
                        template: source.to_string(),
                        brace: '}',
                    });
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The original template text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Distinct field names, in order of first appearance
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field(name) = segment {
                if !fields.contains(&name.as_str()) {
                    fields.push(name);
                }
            }
        }
        fields
    }

    /// Substitute values into the placeholders
    ///
    /// Values for names the template does not use are ignored.
    pub fn format(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Field(name) => {
                    let (_, value) = values
                        .iter()
                        .find(|(key, _)| key == name)
                        .ok_or_else(|| TemplateError::MissingValue(name.clone()))?;
                    output.push_str(value);
                }
            }
        }
        Ok(output)
    }

    /// Recover placeholder values from a string produced by this template
    ///
    /// Matching is anchored at the start of `input` only. Placeholders match
    /// greedily and backtrack; a repeated placeholder must capture the same
    /// text as its first occurrence. Returns `None` when no assignment lines
    /// up with the input.
    pub fn reverse(&self, input: &str, multiline: bool) -> Option<IndexMap<String, String>> {
        trace!(template = %self.source, multiline, "reverse formatting");
        let mut values = IndexMap::new();
        match_segments(&self.segments, input, multiline, &mut values).then_some(values)
    }
}

fn match_segments(
    segments: &[Segment],
    input: &str,
    multiline: bool,
    values: &mut IndexMap<String, String>,
) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return true;
    };

    match segment {
        Segment::Literal(text) => input
            .strip_prefix(text.as_str())
            .is_some_and(|remaining| match_segments(rest, remaining, multiline, values)),
        Segment::Field(name) => {
            if let Some(bound) = values.get(name) {
                return match input.strip_prefix(bound.as_str()) {
                    Some(remaining) => match_segments(rest, remaining, multiline, values),
                    None => false,
                };
            }

            // Without multiline a value stops at the first newline.
            let limit = if multiline {
                input.len()
            } else {
                input.find('\n').unwrap_or(input.len())
            };
            for end in (0..=limit).rev().filter(|&end| input.is_char_boundary(end)) {
                values.insert(name.clone(), input[..end].to_string());
                if match_segments(rest, &input[end..], multiline, values) {
                    return true;
                }
                values.shift_remove(name);
            }
            false
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Builder for reverse-format calls
#[derive(Debug, Clone, Copy)]
pub struct ReverseFormat<'a> {
    template: &'a str,
    multiline: bool,
}

impl<'a> ReverseFormat<'a> {
    /// Reverse against the given template text
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            multiline: false,
        }
    }

    /// Allow captured values to span newlines
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Recover values, failing if the input does not match
    pub fn apply(&self, input: &str) -> Result<IndexMap<String, String>, TemplateError> {
        Template::parse(self.template)?
            .reverse(input, self.multiline)
            .ok_or_else(|| TemplateError::NoMatch {
                input: input.to_string(),
                template: self.template.to_string(),
            })
    }

    /// Recover values, falling back to `default` if the input does not match
    ///
    /// An invalid template is still an error.
    pub fn apply_or(
        &self,
        input: &str,
        default: IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>, TemplateError> {
        Ok(Template::parse(self.template)?
            .reverse(input, self.multiline)
            .unwrap_or(default))
    }
}

/// Inverse of template formatting
///
/// Returns a mapping of the template's field names to their values in
/// `input`.
pub fn reverse_format(
    input: &str,
    template: &str,
) -> Result<IndexMap<String, String>, TemplateError> {
    ReverseFormat::new(template).apply(input)
}

/// Like [`reverse_format`], returning `default` when the input does not match
pub fn reverse_format_or(
    input: &str,
    template: &str,
    default: IndexMap<String, String>,
) -> Result<IndexMap<String, String>, TemplateError> {
    ReverseFormat::new(template).apply_or(input, default)
}
