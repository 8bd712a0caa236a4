//! Decomposition of author and editor lists into structured names.
//!
//! BibTeX accepts a name either as `First von Last` or as `von Last, First` (optionally with a
//! `, Jr` part). Which words form the `von` part cannot be decided without a dictionary, so the
//! parser asks a [`PropositionRule`]; the default rule treats words starting with a lowercase
//! ascii letter as propositions. The result is best-effort.
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;

static AND_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\band\b").expect("valid separator pattern"));

static COMMA_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^,]+,[^,]+").expect("valid comma pattern"));

/// Literals which, directly after the first comma, mark a `First Last, Jr.` name.
const SUFFIXES: [&str; 2] = ["Jr.", "Sen."];

/// A single decomposed name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Name {
    /// Particles such as `van` or `de la`.
    pub propositions: Vec<String>,
    pub lastnames: Vec<String>,
    pub firstnames: Vec<String>,
    /// Trailing parts such as `Jr.`.
    pub suffixes: Vec<String>,
}

impl Name {
    /// The abbreviated form: propositions and lastnames followed by the initials of the
    /// firstnames, e.g. `Fritz, C. W.` for `Fritz, Christian Wilhelm`.
    pub fn short(&self) -> String {
        let mut parts = self.propositions.clone();

        let mut last = self.lastnames.join(" ");
        if !self.firstnames.is_empty() {
            last.push(',');
        }
        parts.push(last);

        for firstname in &self.firstnames {
            let mut chars = firstname.chars();
            if let Some(initial) = chars.next() {
                let mut abbrev = initial.to_string();
                if chars.next().is_some() {
                    abbrev.push('.');
                }
                parts.push(abbrev);
            }
        }

        parts.join(" ")
    }
}

/// Decides whether a name part is a proposition (nobiliary particle).
pub trait PropositionRule: Send + Sync {
    fn is_proposition(&self, part: &str) -> bool;
}

impl<F> PropositionRule for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_proposition(&self, part: &str) -> bool {
        self(part)
    }
}

/// Treats a part as a proposition when its first character is in `a..=z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseInitial;

impl PropositionRule for LowercaseInitial {
    fn is_proposition(&self, part: &str) -> bool {
        part.as_bytes().first().is_some_and(u8::is_ascii_lowercase)
    }
}

/// Splits a normalized author or editor field into [`Name`]s.
#[derive(Clone)]
pub struct NameParser {
    rule: Arc<dyn PropositionRule>,
}

impl Default for NameParser {
    fn default() -> Self {
        Self::new(LowercaseInitial)
    }
}

impl fmt::Debug for NameParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameParser").finish_non_exhaustive()
    }
}

impl NameParser {
    pub fn new<R: PropositionRule + 'static>(rule: R) -> Self {
        Self {
            rule: Arc::new(rule),
        }
    }

    /// Parse every name in `text`.
    pub fn parse(&self, text: &str) -> Vec<Name> {
        split_names(text)
            .iter()
            .map(|candidate| self.parse_name(&tokenize(candidate)))
            .collect()
    }

    fn is_proposition(&self, part: &str) -> bool {
        self.rule.is_proposition(part)
    }

    fn parse_name(&self, parts: &[String]) -> Name {
        let comma = parts.iter().position(|p| p == ",");

        match comma {
            Some(c) if c > 0 && !is_suffix(parts.get(c + 1)) => {
                self.parse_last_first(&parts[..c], &parts[c + 1..])
            }
            _ => self.parse_first_last(parts, comma),
        }
    }

    /// `[propositions] Lastnames, Firstnames[, Suffixes]`
    fn parse_last_first(&self, before: &[String], after: &[String]) -> Name {
        let split = before
            .iter()
            .rposition(|p| self.is_proposition(p))
            .map_or(0, |p| p + 1);
        let (firstnames, suffixes) = split_at_comma(after);

        Name {
            propositions: before[..split].to_vec(),
            lastnames: before[split..].to_vec(),
            firstnames,
            suffixes,
        }
    }

    /// `Firstnames [propositions] Lastnames[, Suffixes]`
    fn parse_first_last(&self, parts: &[String], comma: Option<usize>) -> Name {
        let first = parts.iter().position(|p| self.is_proposition(p));
        let last = parts.iter().rposition(|p| self.is_proposition(p));

        match (first, last) {
            (Some(first), Some(last)) if last > 0 => {
                let (lastnames, suffixes) = split_at_comma(&parts[last + 1..]);
                Name {
                    propositions: parts[first..=last].to_vec(),
                    lastnames,
                    firstnames: parts[..first].to_vec(),
                    suffixes,
                }
            }
            // without propositions, several lastnames must be grouped in braces
            _ => match comma {
                Some(c) if c > 0 => Name {
                    propositions: Vec::new(),
                    lastnames: vec![parts[c - 1].clone()],
                    firstnames: parts[..c - 1].to_vec(),
                    suffixes: parts[c + 1..].to_vec(),
                },
                _ => match parts.split_last() {
                    Some((lastname, firstnames)) => Name {
                        propositions: Vec::new(),
                        lastnames: vec![lastname.clone()],
                        firstnames: firstnames.to_vec(),
                        suffixes: Vec::new(),
                    },
                    None => Name::default(),
                },
            },
        }
    }
}

fn is_suffix(part: Option<&String>) -> bool {
    part.is_some_and(|p| SUFFIXES.contains(&p.as_str()))
}

/// Split `parts` at the first comma token, dropping the comma.
fn split_at_comma(parts: &[String]) -> (Vec<String>, Vec<String>) {
    match parts.iter().position(|p| p == ",") {
        Some(c) => (parts[..c].to_vec(), parts[c + 1..].to_vec()),
        None => (parts.to_vec(), Vec::new()),
    }
}

/// Split a list of names on the word `and`, or, for a single segment holding at least two
/// commas, into consecutive `Last, First` pairs.
fn split_names(text: &str) -> Vec<String> {
    let mut segments: Vec<&str> = AND_SEPARATOR.split(text).map(str::trim).collect();

    if segments.len() == 1 && segments[0].matches(',').count() >= 2 {
        let single = segments[0];
        segments = COMMA_PAIR
            .find_iter(single)
            .map(|m| m.as_str().trim())
            .collect();
    }

    segments
        .into_iter()
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a single name into parts. Spaces and commas outside braces separate parts, the braces
/// themselves are dropped, and every comma becomes a part of its own.
fn tokenize(name: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut depth = 0usize;

    for ch in name.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ' ' | ',' if depth == 0 => {
                if ch == ',' {
                    parts.push(",".to_string());
                    parts.push(String::new());
                } else if parts.last().is_some_and(|p| !p.is_empty()) {
                    parts.push(String::new());
                }
            }
            _ => {
                if let Some(current) = parts.last_mut() {
                    current.push(ch);
                }
            }
        }
    }

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(
        propositions: &[&str],
        lastnames: &[&str],
        firstnames: &[&str],
        suffixes: &[&str],
    ) -> Name {
        let own = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect();
        Name {
            propositions: own(propositions),
            lastnames: own(lastnames),
            firstnames: own(firstnames),
            suffixes: own(suffixes),
        }
    }

    fn parse(text: &str) -> Vec<Name> {
        NameParser::default().parse(text)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Tom,P"), vec!["Tom", ",", "P"]);
        assert_eq!(tokenize("Johan  de Kleer"), vec!["Johan", "de", "Kleer"]);
        assert_eq!(
            tokenize("{Fritz Lang O'Brian}, Christian"),
            vec!["Fritz Lang O'Brian", ",", "Christian"]
        );
        assert_eq!(tokenize("{{A}, B}"), vec!["A, B"]);
        assert!(tokenize("  ").is_empty());
    }

    #[test]
    fn test_last_first() {
        assert_eq!(
            parse("Fritz, Christian Wilhelm"),
            vec![name(&[], &["Fritz"], &["Christian", "Wilhelm"], &[])]
        );
        assert_eq!(
            parse("van Beethoven, Ludwig"),
            vec![name(&["van"], &["Beethoven"], &["Ludwig"], &[])]
        );
        assert_eq!(
            NameParser::default().parse_name(&tokenize("de la Fritz Lang, Christian, Jr.")),
            name(&["de", "la"], &["Fritz", "Lang"], &["Christian"], &["Jr."])
        );
    }

    #[test]
    fn test_comma_pairs_drop_trailing_suffix() {
        // two commas without `and` are read as a list of `Last, First` pairs
        assert_eq!(
            parse("de la Fritz Lang, Christian, Jr."),
            vec![name(&["de", "la"], &["Fritz", "Lang"], &["Christian"], &[])]
        );
    }

    #[test]
    fn test_first_last() {
        assert_eq!(
            parse("Johan de Kleer"),
            vec![name(&["de"], &["Kleer"], &["Johan"], &[])]
        );
        assert_eq!(
            parse("Christian Wilhelm de la Fritz, Jr."),
            vec![name(&["de", "la"], &["Fritz"], &["Christian", "Wilhelm"], &["Jr."])]
        );
        assert_eq!(
            parse("Martin Luther King, Jr."),
            vec![name(&[], &["King"], &["Martin", "Luther"], &["Jr."])]
        );
        assert_eq!(
            parse("Christian {Fritz Lang}"),
            vec![name(&[], &["Fritz Lang"], &["Christian"], &[])]
        );
        assert_eq!(parse("Knuth"), vec![name(&[], &["Knuth"], &[], &[])]);
    }

    #[test]
    fn test_leading_proposition_only() {
        // a single leading lowercase word is not taken as a proposition
        assert_eq!(
            parse("van Beethoven"),
            vec![name(&[], &["Beethoven"], &["van"], &[])]
        );
    }

    #[test]
    fn test_split_on_and() {
        assert_eq!(
            parse("Christian Fritz and Johan de Kleer"),
            vec![
                name(&[], &["Fritz"], &["Christian"], &[]),
                name(&["de"], &["Kleer"], &["Johan"], &[]),
            ]
        );
        // `and` inside a word does not split
        assert_eq!(
            parse("Alexander Anderson"),
            vec![name(&[], &["Anderson"], &["Alexander"], &[])]
        );
    }

    #[test]
    fn test_split_on_comma_pairs() {
        assert_eq!(
            parse("Fritz, Christian, de Kleer, Johan"),
            vec![
                name(&[], &["Fritz"], &["Christian"], &[]),
                name(&["de"], &["Kleer"], &["Johan"], &[]),
            ]
        );
    }

    #[test]
    fn test_empty() {
        assert!(parse("").is_empty());
        assert!(parse("  ").is_empty());
    }

    #[test]
    fn test_custom_rule() {
        let parser = NameParser::new(|part: &str| matches!(part, "van" | "von" | "Van"));
        assert_eq!(
            parser.parse("Ludwig Van Beethoven"),
            vec![name(&["Van"], &["Beethoven"], &["Ludwig"], &[])]
        );
        // `de` is no longer a proposition
        assert_eq!(
            parser.parse("Johan de Kleer"),
            vec![name(&[], &["Kleer"], &["Johan", "de"], &[])]
        );
    }

    #[test]
    fn test_short() {
        assert_eq!(
            name(&[], &["Fritz"], &["Christian", "Wilhelm"], &[]).short(),
            "Fritz, C. W."
        );
        assert_eq!(
            name(&["de"], &["Kleer"], &["Johan"], &[]).short(),
            "de Kleer, J."
        );
        assert_eq!(name(&[], &["Knuth"], &["D", "E."], &[]).short(), "Knuth, D E.");
        assert_eq!(name(&[], &["Plato"], &[], &[]).short(), "Plato");
        assert_eq!(name(&[], &["Ünal"], &["Özge"], &[]).short(), "Ünal, Ö.");
    }
}
