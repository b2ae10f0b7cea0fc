//! Prefix trie over key tokens.
//!
//! Responsibilities:
//! - Store one value per exact token sequence, with overwrite on re-insert.
//! - Classify a partial input as exact, ambiguous or unmatched.
//! - Match `<any>` children against any single token.
//! - Keep `<bg>` hint values apart from matchable values.
//!
//! Does NOT handle:
//! - `<dir>` expansion (see `context.rs`); the trie stores tokens as given.
//! - Alias resolution or dispatch policy (see `keybuffer.rs`).
//!
//! Invariants:
//! - Every node either holds a value or hint, or has at least one child.
//!   `remove` prunes nodes that stop satisfying this.
//! - Children iterate in `KeyToken` order, so listings are deterministic.
//! - When both a concrete child and an `<any>` child match, the concrete one
//!   is tried first.

use std::collections::BTreeMap;

use crate::key::{KeyCode, KeySequence, KeyToken};

/// Result of looking up a partial key sequence.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, V> {
    /// The input equals a stored sequence that nothing longer extends.
    Exact(&'a V),
    /// The input is a strict prefix of `candidates` stored sequences, and may
    /// also be bound itself.
    Ambiguous {
        exact: Option<&'a V>,
        candidates: usize,
    },
    /// No stored sequence starts with the input.
    None,
}

impl<V> Lookup<'_, V> {
    pub fn has_exact(&self) -> bool {
        matches!(
            self,
            Lookup::Exact(_) | Lookup::Ambiguous { exact: Some(_), .. }
        )
    }
}

#[derive(Debug, Clone)]
struct Node<V> {
    value: Option<V>,
    hint: Option<V>,
    dir_slot: bool,
    children: BTreeMap<KeyToken, Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            value: None,
            hint: None,
            dir_slot: false,
            children: BTreeMap::new(),
        }
    }
}

impl<V> Node<V> {
    fn is_vacant(&self) -> bool {
        self.value.is_none() && self.hint.is_none() && self.children.is_empty()
    }

    fn descendant_values(&self) -> usize {
        self.children
            .values()
            .map(|child| usize::from(child.value.is_some()) + child.descendant_values())
            .sum()
    }

    fn collect<'a>(
        &'a self,
        path: &mut Vec<KeyToken>,
        hints: bool,
        out: &mut Vec<(KeySequence, &'a V)>,
    ) {
        let slot = if hints { &self.hint } else { &self.value };
        if let Some(value) = slot {
            let mut keys = path.clone();
            if hints {
                keys.push(KeyToken::BG);
            }
            out.push((KeySequence::new(keys), value));
        }
        for (token, child) in &self.children {
            path.push(*token);
            child.collect(path, hints, out);
            path.pop();
        }
    }
}

impl<V: Clone> Node<V> {
    fn merge_from(&mut self, other: &Node<V>) {
        if let Some(value) = &other.value {
            self.value = Some(value.clone());
        }
        if let Some(hint) = &other.hint {
            self.hint = Some(hint.clone());
        }
        self.dir_slot |= other.dir_slot;
        for (token, child) in &other.children {
            self.children.entry(*token).or_default().merge_from(child);
        }
    }
}

/// A token trie mapping key sequences to values of type `V`.
#[derive(Debug, Clone)]
pub struct Trie<V> {
    root: Node<V>,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
        }
    }

    /// Number of matchable values stored (hints excluded).
    pub fn len(&self) -> usize {
        usize::from(self.root.value.is_some()) + self.root.descendant_values()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_vacant()
    }

    /// Store `value` under `keys`, returning the value it replaced.
    ///
    /// A trailing `<bg>` stores a hint for the preceding prefix instead.
    pub fn insert(&mut self, keys: &[KeyToken], value: V) -> Option<V> {
        let (path, hint) = split_hint(keys);
        let node = self.node_mut(path);
        if hint {
            node.hint.replace(value)
        } else {
            node.value.replace(value)
        }
    }

    /// Remove the value (or hint, for a trailing `<bg>`) stored under exactly
    /// `keys`. Absent entries are a no-op.
    pub fn remove(&mut self, keys: &[KeyToken]) -> Option<V> {
        let (path, hint) = split_hint(keys);
        remove_at(&mut self.root, path, hint)
    }

    /// The value stored under exactly `keys`, treating wildcards as literals.
    pub fn get(&self, keys: &[KeyToken]) -> Option<&V> {
        self.node(keys).and_then(|node| node.value.as_ref())
    }

    /// The value `keys` would resolve to, with `<any>` matching.
    pub fn find(&self, keys: &[KeyToken]) -> Option<&V> {
        self.frontier(keys)
            .into_iter()
            .find_map(|node| node.value.as_ref())
    }

    /// Classify `keys` against the stored sequences.
    pub fn lookup(&self, keys: &[KeyToken]) -> Lookup<'_, V> {
        let frontier = self.frontier(keys);
        let exact = frontier.iter().find_map(|node| node.value.as_ref());
        let candidates: usize = frontier.iter().map(|node| node.descendant_values()).sum();

        match (exact, candidates) {
            (None, 0) => Lookup::None,
            (Some(value), 0) => Lookup::Exact(value),
            (exact, candidates) => Lookup::Ambiguous { exact, candidates },
        }
    }

    /// The `<bg>` hint registered for the prefix `keys`, if any.
    pub fn hint(&self, keys: &[KeyToken]) -> Option<&V> {
        self.frontier(keys)
            .into_iter()
            .find_map(|node| node.hint.as_ref())
    }

    /// Tokens that can follow `keys` and still reach a value, with the value
    /// bound directly at that next token if there is one.
    pub fn continuations(&self, keys: &[KeyToken]) -> Vec<(KeyToken, Option<&V>)> {
        let mut next: BTreeMap<KeyToken, Option<&V>> = BTreeMap::new();
        for node in self.frontier(keys) {
            for (token, child) in &node.children {
                if child.value.is_none() && child.descendant_values() == 0 {
                    continue;
                }
                let slot = next.entry(*token).or_insert(None);
                if slot.is_none() {
                    *slot = child.value.as_ref();
                }
            }
        }
        next.into_iter().collect()
    }

    /// Every stored value with its key sequence, in token order.
    pub fn entries(&self) -> Vec<(KeySequence, &V)> {
        let mut out = Vec::new();
        self.root.collect(&mut Vec::new(), false, &mut out);
        out
    }

    /// Every `<bg>` hint with its key sequence (ending in `<bg>`).
    pub fn hints(&self) -> Vec<(KeySequence, &V)> {
        let mut out = Vec::new();
        self.root.collect(&mut Vec::new(), true, &mut out);
        out
    }

    /// Mark the node at `keys` as a direction slot, creating it if needed.
    pub fn mark_dir_slot(&mut self, keys: &[KeyToken]) {
        self.node_mut(keys).dir_slot = true;
    }

    /// Clear the direction-slot mark at exactly `keys`, if that node exists.
    pub fn unmark_dir_slot(&mut self, keys: &[KeyToken]) {
        let mut node = &mut self.root;
        for token in keys {
            match node.children.get_mut(token) {
                Some(child) => node = child,
                None => return,
            }
        }
        node.dir_slot = false;
    }

    /// True when some node matching `keys` was marked as a direction slot.
    pub fn is_dir_slot(&self, keys: &[KeyToken]) -> bool {
        self.frontier(keys).iter().any(|node| node.dir_slot)
    }

    fn node(&self, keys: &[KeyToken]) -> Option<&Node<V>> {
        keys.iter()
            .try_fold(&self.root, |node, token| node.children.get(token))
    }

    fn node_mut(&mut self, keys: &[KeyToken]) -> &mut Node<V> {
        keys.iter().fold(&mut self.root, |node, token| {
            node.children.entry(*token).or_default()
        })
    }

    fn frontier(&self, keys: &[KeyToken]) -> Vec<&Node<V>> {
        let mut frontier = vec![&self.root];
        for token in keys {
            let mut next = Vec::new();
            for node in &frontier {
                if let Some(child) = node.children.get(token) {
                    next.push(child);
                }
                if token.code != KeyCode::Any
                    && let Some(child) = node.children.get(&KeyToken::ANY)
                {
                    next.push(child);
                }
            }
            if next.is_empty() {
                return next;
            }
            frontier = next;
        }
        frontier
    }
}

impl<V: Clone> Trie<V> {
    /// Copy every entry, hint and direction-slot mark of `other` into `self`.
    /// Entries from `other` win on conflicting sequences.
    pub fn merge_from(&mut self, other: &Trie<V>) {
        self.root.merge_from(&other.root);
    }
}

fn split_hint(keys: &[KeyToken]) -> (&[KeyToken], bool) {
    match keys.split_last() {
        Some((last, path)) if last.code == KeyCode::Bg => (path, true),
        _ => (keys, false),
    }
}

fn remove_at<V>(node: &mut Node<V>, keys: &[KeyToken], hint: bool) -> Option<V> {
    let Some((first, rest)) = keys.split_first() else {
        return if hint {
            node.hint.take()
        } else {
            node.value.take()
        };
    };

    let child = node.children.get_mut(first)?;
    let removed = remove_at(child, rest, hint);
    if child.is_vacant() {
        node.children.remove(first);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::parse_keys;

    fn keys(spec: &str) -> KeySequence {
        parse_keys(spec).unwrap()
    }

    fn trie(entries: &[(&str, &'static str)]) -> Trie<&'static str> {
        let mut trie = Trie::new();
        for (spec, value) in entries {
            trie.insert(&keys(spec), *value);
        }
        trie
    }

    #[test]
    fn test_exact_lookup_on_leaf() {
        let trie = trie(&[("ZZ", "exit")]);
        assert_eq!(trie.lookup(&keys("ZZ")), Lookup::Exact(&"exit"));
    }

    #[test]
    fn test_strict_prefix_is_ambiguous() {
        let trie = trie(&[("zh", "hidden"), ("zp", "preview")]);
        assert_eq!(
            trie.lookup(&keys("z")),
            Lookup::Ambiguous {
                exact: None,
                candidates: 2
            }
        );
        assert_eq!(trie.lookup(&keys("zx")), Lookup::None);
    }

    #[test]
    fn test_bound_prefix_reports_exact_flag() {
        let trie = trie(&[("d", "cut"), ("dd", "cut-line")]);
        let lookup = trie.lookup(&keys("d"));
        assert!(lookup.has_exact());
        assert_eq!(
            lookup,
            Lookup::Ambiguous {
                exact: Some(&"cut"),
                candidates: 1
            }
        );
    }

    #[test]
    fn test_insert_overwrites() {
        let mut trie = trie(&[("gg", "first")]);
        assert_eq!(trie.insert(&keys("gg"), "second"), Some("first"));
        assert_eq!(trie.get(&keys("gg")), Some(&"second"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_remove_prunes_empty_nodes() {
        let mut trie = trie(&[("gg", "top"), ("gh", "home")]);
        assert_eq!(trie.remove(&keys("gg")), Some("top"));
        assert_eq!(
            trie.lookup(&keys("g")),
            Lookup::Ambiguous {
                exact: None,
                candidates: 1
            }
        );
        assert_eq!(trie.remove(&keys("gh")), Some("home"));
        assert!(trie.is_empty());
        assert_eq!(trie.lookup(&keys("g")), Lookup::None);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut trie = trie(&[("gg", "top")]);
        assert_eq!(trie.remove(&keys("gx")), None);
        assert_eq!(trie.remove(&keys("g")), None);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_any_matches_single_token() {
        let trie = trie(&[("m<any>", "set-bookmark")]);
        assert_eq!(trie.lookup(&keys("ma")), Lookup::Exact(&"set-bookmark"));
        assert_eq!(trie.lookup(&keys("m<C-x>")), Lookup::Exact(&"set-bookmark"));
        assert_eq!(trie.lookup(&keys("mab")), Lookup::None);
    }

    #[test]
    fn test_concrete_child_beats_any() {
        let trie = trie(&[("<any>", "type"), ("Q", "quit")]);
        assert_eq!(trie.find(&keys("Q")), Some(&"quit"));
        assert_eq!(trie.find(&keys("x")), Some(&"type"));
    }

    #[test]
    fn test_hints_are_not_matchable() {
        let trie = trie(&[("p<bg>", "paste-hint"), ("pp", "paste")]);
        assert_eq!(
            trie.lookup(&keys("p")),
            Lookup::Ambiguous {
                exact: None,
                candidates: 1
            }
        );
        assert_eq!(trie.hint(&keys("p")), Some(&"paste-hint"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_hint_only_prefix_matches_nothing() {
        let trie = trie(&[("z<bg>", "hint")]);
        assert_eq!(trie.lookup(&keys("z")), Lookup::None);
        assert_eq!(trie.hint(&keys("z")), Some(&"hint"));
    }

    #[test]
    fn test_remove_hint_keeps_value() {
        let mut trie = trie(&[("p<bg>", "paste-hint"), ("pp", "paste")]);
        assert_eq!(trie.remove(&keys("p<bg>")), Some("paste-hint"));
        assert_eq!(trie.hint(&keys("p")), None);
        assert_eq!(trie.get(&keys("pp")), Some(&"paste"));
    }

    #[test]
    fn test_continuations_list_reachable_tokens() {
        let trie = trie(&[("gg", "top"), ("gh", "home"), ("g<bg>", "hint")]);
        let next: Vec<(String, Option<&&str>)> = trie
            .continuations(&keys("g"))
            .into_iter()
            .map(|(token, value)| (token.to_string(), value))
            .collect();
        assert_eq!(
            next,
            vec![("g".to_string(), Some(&"top")), ("h".to_string(), Some(&"home"))]
        );
    }

    #[test]
    fn test_entries_are_sorted() {
        let trie = trie(&[("zh", "b"), ("ZZ", "a"), ("gg", "c")]);
        let specs: Vec<String> = trie.entries().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(specs, vec!["ZZ", "gg", "zh"]);
    }

    #[test]
    fn test_hints_listing() {
        let trie = trie(&[("o<bg>", "sort"), ("oa", "x")]);
        let hints: Vec<String> = trie.hints().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(hints, vec!["o<bg>"]);
    }

    #[test]
    fn test_merge_from_later_wins() {
        let mut target = trie(&[("Q", "target-quit"), ("x", "target-only")]);
        let source = trie(&[("Q", "source-quit"), ("y", "source-only")]);
        target.merge_from(&source);
        assert_eq!(target.get(&keys("Q")), Some(&"source-quit"));
        assert_eq!(target.get(&keys("x")), Some(&"target-only"));
        assert_eq!(target.get(&keys("y")), Some(&"source-only"));
    }

    #[test]
    fn test_merge_copies_so_removal_is_local() {
        let source = trie(&[("Q", "quit")]);
        let mut target = Trie::new();
        target.merge_from(&source);
        target.remove(&keys("Q"));
        assert_eq!(target.get(&keys("Q")), None);
        assert_eq!(source.get(&keys("Q")), Some(&"quit"));
    }

    #[test]
    fn test_dir_slot_marks() {
        let mut trie = trie(&[("dgg", "cut")]);
        trie.mark_dir_slot(&keys("d"));
        assert!(trie.is_dir_slot(&keys("d")));
        assert!(!trie.is_dir_slot(&keys("dg")));
        assert!(!trie.is_dir_slot(&[]));

        trie.unmark_dir_slot(&keys("d"));
        assert!(!trie.is_dir_slot(&keys("d")));
        trie.unmark_dir_slot(&keys("xyz"));
        assert_eq!(trie.len(), 1);
    }
}
