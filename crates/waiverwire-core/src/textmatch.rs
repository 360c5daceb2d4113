// Keyword pattern tables for free-text blurbs (injury context, player news).
//
// Pattern syntax, applied to lowercased alphanumeric tokens:
//   word        exact token
//   word*       token starting with `word`
//   30+         numeric token >= 30
//   a|b|c       any one of the alternatives
//   word?       optional slot (may also wrap alternatives: `to|into?`)
//   a b ... c   `...` separates segments; segments occur in order with any gap,
//               words inside a segment are consecutive

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("empty keyword pattern")]
    Empty,

    #[error("invalid token `{token}` in pattern `{pattern}`")]
    BadToken { pattern: String, token: String },
}

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Atom {
    Word(String),
    Prefix(String),
    AtLeast(u32),
}

impl Atom {
    fn matches(&self, token: &str) -> bool {
        match self {
            Atom::Word(w) => token == w,
            Atom::Prefix(p) => token.starts_with(p.as_str()),
            Atom::AtLeast(n) => token.parse::<u32>().is_ok_and(|v| v >= *n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    alternatives: Vec<Atom>,
    optional: bool,
}

impl Slot {
    fn matches(&self, token: &str) -> bool {
        self.alternatives.iter().any(|a| a.matches(token))
    }
}

/// A compiled keyword pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    source: String,
    segments: Vec<Vec<Slot>>,
}

fn parse_atom(pattern: &str, raw: &str) -> Result<Atom, PatternError> {
    let bad = || PatternError::BadToken {
        pattern: pattern.to_string(),
        token: raw.to_string(),
    };
    if let Some(num) = raw.strip_suffix('+') {
        return num.parse::<u32>().map(Atom::AtLeast).map_err(|_| bad());
    }
    let (word, prefix) = match raw.strip_suffix('*') {
        Some(w) => (w, true),
        None => (raw, false),
    };
    if word.is_empty() || !word.chars().all(char::is_alphanumeric) {
        return Err(bad());
    }
    let word = word.to_lowercase();
    Ok(if prefix {
        Atom::Prefix(word)
    } else {
        Atom::Word(word)
    })
}

impl Pattern {
    pub fn parse(pattern: &str) -> Result<Pattern, PatternError> {
        let mut segments = Vec::new();
        for segment in pattern.split("...") {
            let mut slots = Vec::new();
            for token in segment.split_whitespace() {
                let (body, optional) = match token.strip_suffix('?') {
                    Some(b) => (b, true),
                    None => (token, false),
                };
                let alternatives = body
                    .split('|')
                    .map(|alt| parse_atom(pattern, alt))
                    .collect::<Result<Vec<_>, _>>()?;
                slots.push(Slot {
                    alternatives,
                    optional,
                });
            }
            if slots.is_empty() || slots.iter().all(|s| s.optional) {
                return Err(PatternError::Empty);
            }
            segments.push(slots);
        }
        Ok(Pattern {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shortest match of `slots` starting exactly at `pos`; returns the end index.
    fn match_slots(slots: &[Slot], tokens: &[String], pos: usize) -> Option<usize> {
        let Some((first, rest)) = slots.split_first() else {
            return Some(pos);
        };
        if first.optional {
            if let Some(end) = Self::match_slots(rest, tokens, pos) {
                return Some(end);
            }
        }
        match tokens.get(pos) {
            Some(t) if first.matches(t) => Self::match_slots(rest, tokens, pos + 1),
            _ => None,
        }
    }

    /// Earliest-ending match of a segment at or after `from`.
    fn find_segment(slots: &[Slot], tokens: &[String], from: usize) -> Option<usize> {
        (from..tokens.len())
            .filter_map(|start| Self::match_slots(slots, tokens, start))
            .min()
    }

    /// First match whose first segment starts at or after `from`.
    /// Returns `(start, end)` token indices.
    fn find_from(&self, tokens: &[String], from: usize) -> Option<(usize, usize)> {
        let (head, tail) = self.segments.split_first()?;
        for start in from..tokens.len() {
            let Some(mut end) = Self::match_slots(head, tokens, start) else {
                continue;
            };
            let mut matched = true;
            for seg in tail {
                match Self::find_segment(seg, tokens, end) {
                    Some(e) => end = e,
                    None => {
                        matched = false;
                        break;
                    }
                }
            }
            if matched {
                return Some((start, end));
            }
        }
        None
    }

    pub fn is_match(&self, tokens: &[String]) -> bool {
        self.find_from(tokens, 0).is_some()
    }
}

// ---------------------------------------------------------------------------
// Rules and tables
// ---------------------------------------------------------------------------

/// Number of tokens before a match inspected by a rule's `unless` veto.
const UNLESS_WINDOW: usize = 3;

/// One (pattern, multiplier) entry of a keyword table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    pub label: String,
    pub multiplier: f64,
    pattern: Pattern,
    unless: Option<Pattern>,
}

impl KeywordRule {
    pub fn new(label: &str, multiplier: f64, pattern: &str) -> Result<Self, PatternError> {
        Ok(KeywordRule {
            label: label.to_string(),
            multiplier,
            pattern: Pattern::parse(pattern)?,
            unless: None,
        })
    }

    /// Veto the match when `pattern` occurs within the few words right
    /// before it ("no minutes restriction").
    pub fn unless(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.unless = Some(Pattern::parse(pattern)?);
        Ok(self)
    }

    pub fn matches(&self, tokens: &[String]) -> bool {
        let mut from = 0;
        while let Some((start, _)) = self.pattern.find_from(tokens, from) {
            let vetoed = self.unless.as_ref().is_some_and(|u| {
                let window = &tokens[start.saturating_sub(UNLESS_WINDOW)..start];
                u.is_match(window)
            });
            if !vetoed {
                return true;
            }
            from = start + 1;
        }
        false
    }
}

/// A keyword hit: the rule's label and multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHit {
    pub label: String,
    pub multiplier: f64,
}

/// Static entry used to build default tables: (label, multiplier, pattern, unless).
pub type RuleSpec = (&'static str, f64, &'static str, Option<&'static str>);

/// Ordered list of keyword rules evaluated independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        KeywordTable { rules }
    }

    /// Compile a built-in table.
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self, PatternError> {
        let mut rules = Vec::with_capacity(specs.len());
        for (label, mult, pattern, unless) in specs {
            let mut rule = KeywordRule::new(label, *mult, pattern)?;
            if let Some(u) = unless {
                rule = rule.unless(u)?;
            }
            rules.push(rule);
        }
        Ok(KeywordTable { rules })
    }

    pub fn push(&mut self, rule: KeywordRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Scan text and return one hit per label (the first matching rule for
    /// that label), in table order.
    pub fn scan(&self, text: &str) -> Vec<KeywordHit> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<KeywordHit> = Vec::new();
        for rule in &self.rules {
            if hits.iter().any(|h| h.label == rule.label) {
                continue;
            }
            if rule.matches(&tokens) {
                hits.push(KeywordHit {
                    label: rule.label.clone(),
                    multiplier: rule.multiplier,
                });
            }
        }
        hits
    }

    /// True when any rule matches.
    pub fn matches_any(&self, text: &str) -> bool {
        let tokens = tokenize(text);
        !tokens.is_empty() && self.rules.iter().any(|r| r.matches(&tokens))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
