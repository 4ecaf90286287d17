//! Message template compilation and formatting
//!
//! Raw resource strings carry an ICU-style grammar: positional (`{0}`)
//! and named (`{name}`) placeholders, `plural`/`select` placeables with
//! `#` bound to the matched number, and doubled braces as literal
//! escapes. A template is compiled once per `(key, template)` pair and
//! the compiled form is shared through a process-wide cache, so reusing
//! the same strings across an application costs one compilation total.

use crate::error::{LocalizeError, LocalizeResult};
use crate::plural::{plural_category, PluralCategory};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A single argument value passed to `localize`
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl ArgValue {
    /// Render the value as display text
    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => render_number(*value),
        }
    }

    /// Interpret the value as a number, for plural selection
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.trim().parse().ok(),
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Normalized named-argument map for message formatting
///
/// Both calling conventions land here: positional values become the
/// names `"0"`, `"1"`, ... and builder-style pairs keep their given
/// names. The formatter itself only ever sees this normalized form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageArgs {
    values: HashMap<String, ArgValue>,
}

impl MessageArgs {
    /// Create an empty argument map
    pub fn new() -> Self {
        Self::default()
    }

    /// Legacy positional convention: values are named by their index
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgValue>,
    {
        let mut args = Self::new();
        for (index, value) in values.into_iter().enumerate() {
            args.values.insert(index.to_string(), value.into());
        }
        args
    }

    /// Builder-style insertion of a named argument
    pub fn set(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Look up an argument by name
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build a [`MessageArgs`] from `name => value` pairs
#[macro_export]
macro_rules! message_args {
    () => {
        $crate::formatter::MessageArgs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::formatter::MessageArgs::new();
        $(args = args.set($name, $value);)+
        args
    }};
}

/// Arm selector inside a `plural` placeable
#[derive(Debug, Clone, PartialEq)]
enum PluralSelector {
    /// `=N` exact match, checked before categories
    Exact(i64),
    Category(PluralCategory),
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
    /// `#` inside a plural arm; renders the matched number
    Count,
    Plural {
        arg: String,
        arms: Vec<(PluralSelector, Vec<Segment>)>,
    },
    Select {
        arg: String,
        arms: Vec<(String, Vec<Segment>)>,
    },
}

/// A resource template compiled into directly renderable segments
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMessage {
    segments: Vec<Segment>,
}

impl CompiledMessage {
    /// Compile a raw template string
    pub fn compile(template: &str) -> LocalizeResult<Self> {
        let segments = Parser::parse(template)?;
        Ok(Self { segments })
    }

    /// Wrap a template verbatim, without interpreting its syntax
    ///
    /// Used as the fail-soft form for templates that do not compile:
    /// the UI still shows the raw text instead of nothing.
    pub fn raw(template: &str) -> Self {
        Self {
            segments: vec![Segment::Literal(template.to_string())],
        }
    }

    /// Apply arguments and produce the final display text
    ///
    /// The language drives plural category selection only; missing
    /// arguments render as empty text rather than failing.
    pub fn format(&self, language: &str, args: &MessageArgs) -> String {
        let mut out = String::new();
        render_segments(&self.segments, language, args, None, &mut out);
        out
    }
}

fn render_segments(
    segments: &[Segment],
    language: &str,
    args: &MessageArgs,
    count: Option<f64>,
    out: &mut String,
) {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                if let Some(value) = args.get(name) {
                    out.push_str(&value.render());
                } else {
                    debug!(name = %name, "missing argument for placeholder");
                }
            }
            Segment::Count => {
                if let Some(value) = count {
                    out.push_str(&render_number(value));
                }
            }
            Segment::Plural { arg, arms } => {
                let value = args.get(arg).and_then(ArgValue::as_number);
                let chosen = select_plural_arm(arms, language, value);
                if let Some(body) = chosen {
                    render_segments(body, language, args, value, out);
                }
            }
            Segment::Select { arg, arms } => {
                let key = args.get(arg).map(|value| value.render());
                let chosen = arms
                    .iter()
                    .find(|(name, _)| Some(name.as_str()) == key.as_deref())
                    .or_else(|| arms.iter().find(|(name, _)| name == "other"));
                if let Some((_, body)) = chosen {
                    render_segments(body, language, args, count, out);
                }
            }
        }
    }
}

/// Pick a plural arm: exact `=N` matches win, then the language's
/// category, then `other`
fn select_plural_arm<'a>(
    arms: &'a [(PluralSelector, Vec<Segment>)],
    language: &str,
    value: Option<f64>,
) -> Option<&'a Vec<Segment>> {
    if let Some(value) = value {
        if value.fract() == 0.0 {
            let exact = value as i64;
            for (selector, body) in arms {
                if matches!(selector, PluralSelector::Exact(n) if *n == exact) {
                    return Some(body);
                }
            }
        }
        let category = plural_category(language, value);
        for (selector, body) in arms {
            if matches!(selector, PluralSelector::Category(c) if *c == category) {
                return Some(body);
            }
        }
    }
    arms.iter()
        .find(|(selector, _)| {
            matches!(selector, PluralSelector::Category(PluralCategory::Other))
        })
        .map(|(_, body)| body)
}

/// Render a number without a trailing `.0` for whole values
fn render_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// Recursive-descent parser over the template grammar
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn parse(template: &str) -> LocalizeResult<Vec<Segment>> {
        let mut parser = Self {
            chars: template.chars().collect(),
            pos: 0,
        };
        let segments = parser.segments(false, true)?;
        if parser.pos < parser.chars.len() {
            return Err(parser.error("unmatched '}'"));
        }
        Ok(segments)
    }

    /// Parse until end of input or a bare `}` (left for the caller)
    ///
    /// Doubled-brace escapes apply only outside placeables; inside arm
    /// bodies a consecutive run of `}` closes nested structure, so the
    /// two-character escape would be ambiguous there.
    fn segments(&mut self, in_plural: bool, top_level: bool) -> LocalizeResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        while let Some(c) = self.peek() {
            match c {
                '{' if top_level && self.peek_at(1) == Some('{') => {
                    literal.push('{');
                    self.pos += 2;
                }
                '}' if top_level && self.peek_at(1) == Some('}') => {
                    literal.push('}');
                    self.pos += 2;
                }
                '}' => break,
                '{' => {
                    flush_literal(&mut literal, &mut segments);
                    self.pos += 1;
                    segments.push(self.placeable(in_plural)?);
                }
                '#' if in_plural => {
                    flush_literal(&mut literal, &mut segments);
                    segments.push(Segment::Count);
                    self.pos += 1;
                }
                other => {
                    literal.push(other);
                    self.pos += 1;
                }
            }
        }
        flush_literal(&mut literal, &mut segments);
        Ok(segments)
    }

    /// Parse the inside of a `{...}` placeable, after the opening brace
    fn placeable(&mut self, in_plural: bool) -> LocalizeResult<Segment> {
        let name = self.word()?;
        self.skip_ws();
        match self.next() {
            Some('}') => Ok(Segment::Placeholder(name)),
            Some(',') => {
                self.skip_ws();
                let kind = self.word()?;
                self.skip_ws();
                if self.next() != Some(',') {
                    return Err(self.error("expected ',' after placeable type"));
                }
                match kind.as_str() {
                    "plural" => self.plural_arms(name),
                    "select" => self.select_arms(name, in_plural),
                    other => Err(self.error(&format!("unsupported placeable type '{other}'"))),
                }
            }
            _ => Err(self.error("expected '}' or ',' in placeable")),
        }
    }

    fn plural_arms(&mut self, arg: String) -> LocalizeResult<Segment> {
        let mut arms = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated plural placeable")),
                _ => {
                    let keyword = self.word()?;
                    let selector = if let Some(digits) = keyword.strip_prefix('=') {
                        let exact = digits.parse().map_err(|_| {
                            self.error(&format!("invalid exact plural selector '={digits}'"))
                        })?;
                        PluralSelector::Exact(exact)
                    } else {
                        PluralCategory::from_keyword(&keyword)
                            .map(PluralSelector::Category)
                            .ok_or_else(|| {
                                self.error(&format!("unknown plural category '{keyword}'"))
                            })?
                    };
                    arms.push((selector, self.arm_body(true)?));
                }
            }
        }
        let has_other = arms.iter().any(|(selector, _)| {
            matches!(selector, PluralSelector::Category(PluralCategory::Other))
        });
        if !has_other {
            return Err(self.error("plural placeable is missing an 'other' arm"));
        }
        Ok(Segment::Plural { arg, arms })
    }

    fn select_arms(&mut self, arg: String, in_plural: bool) -> LocalizeResult<Segment> {
        let mut arms = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated select placeable")),
                _ => {
                    let key = self.word()?;
                    arms.push((key, self.arm_body(in_plural)?));
                }
            }
        }
        if !arms.iter().any(|(key, _)| key == "other") {
            return Err(self.error("select placeable is missing an 'other' arm"));
        }
        Ok(Segment::Select { arg, arms })
    }

    /// Parse a brace-delimited arm body
    fn arm_body(&mut self, in_plural: bool) -> LocalizeResult<Vec<Segment>> {
        self.skip_ws();
        if self.next() != Some('{') {
            return Err(self.error("expected '{' to open arm body"));
        }
        let body = self.segments(in_plural, false)?;
        if self.next() != Some('}') {
            return Err(self.error("unterminated arm body"));
        }
        Ok(body)
    }

    /// Read a bare word: an argument name, placeable type, or selector
    fn word(&mut self) -> LocalizeResult<String> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, message: &str) -> LocalizeError {
        LocalizeError::MalformedTemplate {
            message: format!("{message} at offset {}", self.pos),
        }
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

/// Process-wide cache of compiled messages keyed by `(key, template)`
///
/// Embedding the template in the key means entries compiled under a
/// superseded language can never collide with the current one; they
/// simply accumulate. The cache is never evicted, which is bounded in
/// practice by a page's distinct message strings.
#[derive(Debug, Default)]
pub struct MessageCache {
    entries: DashMap<(String, String), Arc<CompiledMessage>>,
}

impl MessageCache {
    /// Create a private cache (tests, isolated component families)
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide cache
    pub fn global() -> Arc<MessageCache> {
        static GLOBAL: Lazy<Arc<MessageCache>> = Lazy::new(|| Arc::new(MessageCache::new()));
        Arc::clone(&GLOBAL)
    }

    /// Fetch the compiled form of a template, compiling on first use
    ///
    /// A malformed template compiles to a literal holding the raw text,
    /// so the UI still renders something; the defect is logged when it
    /// is first compiled. Concurrent insertion of the same pair is
    /// idempotent: both callers compile to equivalent results.
    pub fn get_or_compile(&self, key: &str, template: &str) -> Arc<CompiledMessage> {
        let cache_key = (key.to_string(), template.to_string());
        if let Some(entry) = self.entries.get(&cache_key) {
            return Arc::clone(&entry);
        }
        let compiled = match CompiledMessage::compile(template) {
            Ok(message) => message,
            Err(e) => {
                warn!(key = %key, error = %e, "malformed message template; using raw text");
                CompiledMessage::raw(template)
            }
        };
        let entry = self
            .entries
            .entry(cache_key)
            .or_insert_with(|| Arc::new(compiled));
        Arc::clone(&entry)
    }

    /// Number of cached compiled messages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
