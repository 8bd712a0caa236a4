use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
struct Node {
    children: BTreeMap<u8, usize>,
    value: Option<char>,
}

/// A byte trie over macro strings.
///
/// Scanning is leftmost-longest: at each position the longest registered macro wins, and
/// matches never overlap.
#[derive(Debug, Clone)]
pub struct MacroTrie {
    nodes: Vec<Node>,
    len: usize,
}

impl Default for MacroTrie {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default()],
            len: 0,
        }
    }
}

impl MacroTrie {
    /// Register `key`. Returns `false` and leaves the trie unchanged if `key` is already
    /// present or empty.
    pub fn insert(&mut self, key: &str, value: char) -> bool {
        if key.is_empty() {
            return false;
        }

        let mut node = 0;
        for &b in key.as_bytes() {
            node = match self.nodes[node].children.get(&b) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(b, next);
                    next
                }
            };
        }

        if self.nodes[node].value.is_some() {
            return false;
        }
        self.nodes[node].value = Some(value);
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The longest registered macro which is a prefix of `text`, as `(length, value)`.
    pub fn longest_prefix(&self, text: &str) -> Option<(usize, char)> {
        let mut node = 0;
        let mut best = None;
        for (idx, b) in text.bytes().enumerate() {
            match self.nodes[node].children.get(&b) {
                Some(&next) => node = next,
                None => break,
            }
            if let Some(value) = self.nodes[node].value {
                best = Some((idx + 1, value));
            }
        }
        best
    }

    /// Iterate over the non-overlapping leftmost-longest matches in `text`.
    pub fn find_iter<'t>(&'t self, text: &'t str) -> Matches<'t> {
        Matches {
            trie: self,
            text,
            pos: 0,
        }
    }
}

/// A macro occurrence found by [`MacroTrie::find_iter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub value: char,
}

pub struct Matches<'t> {
    trie: &'t MacroTrie,
    text: &'t str,
    pos: usize,
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.trie.is_empty() {
            return None;
        }

        while self.pos < self.text.len() {
            let start = self.pos;
            let tail = &self.text[start..];
            if let Some((len, value)) = self.trie.longest_prefix(tail) {
                self.pos = start + len;
                return Some(Match {
                    start,
                    end: self.pos,
                    value,
                });
            }
            // step over one whole char so `pos` stays on a boundary
            self.pos += tail.chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(keys: &[(&str, char)]) -> MacroTrie {
        let mut trie = MacroTrie::default();
        for (key, value) in keys {
            trie.insert(key, *value);
        }
        trie
    }

    #[test]
    fn test_first_insert_wins() {
        let mut trie = MacroTrie::default();
        assert!(trie.insert(r"\ss", 'ß'));
        assert!(!trie.insert(r"\ss", 'x'));
        assert!(!trie.insert("", 'x'));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.longest_prefix(r"\ss rest"), Some((3, 'ß')));
    }

    #[test]
    fn test_longest_match_wins() {
        let trie = trie(&[("--", '–'), ("---", '—')]);
        let found: Vec<_> = trie.find_iter("a---b--c").collect();
        assert_eq!(
            found,
            vec![
                Match { start: 1, end: 4, value: '—' },
                Match { start: 5, end: 7, value: '–' },
            ]
        );
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let trie = trie(&[(r"\'{e}", 'é'), (r"\.{z}", 'ż'), (r"\*", '∗')]);
        let found: Vec<_> = trie.find_iter(r"caf\'{e} \.{z} \* \'{x}").map(|m| m.value).collect();
        assert_eq!(found, vec!['é', 'ż', '∗']);
    }

    #[test]
    fn test_non_ascii_text() {
        let trie = trie(&[(r"\o", 'ø')]);
        let text = r"🍄\o🍄";
        let found: Vec<_> = trie.find_iter(text).collect();
        assert_eq!(found, vec![Match { start: 4, end: 6, value: 'ø' }]);
    }
}
