//! Reflection over parser graphs: enumeration, pure transformation and
//! in-place rewrites.

mod trace;

pub use trace::{debug, profile, progress, Profile, ProfileEntry};

use std::collections::{HashMap, HashSet};

use crate::parser::Parser;

/// Every parser reachable from `root`, each distinct node exactly once,
/// root included. Order is not contractual.
pub fn all_parsers(root: &Parser) -> Vec<Parser> {
    let mut seen = HashSet::new();
    let mut pending = vec![root.clone()];
    let mut parsers = Vec::new();
    while let Some(parser) = pending.pop() {
        if !seen.insert(parser.id()) {
            continue;
        }
        pending.extend(parser.children());
        parsers.push(parser);
    }
    parsers
}

/// Maps every reachable node through `function(node.copy())` and rewires
/// the copies to each other, yielding a structurally-equivalent graph that
/// shares no node identity with the original.
pub fn transform(root: &Parser, function: impl Fn(Parser) -> Parser) -> Parser {
    let mut mapping: HashMap<usize, Parser> = HashMap::new();
    for parser in all_parsers(root) {
        mapping.insert(parser.id(), function(parser.copy()));
    }
    // Until the first rewire passes complete, the new graph still points
    // into the original one; walk it repeatedly, redirecting every child
    // pointer that targets an original node onto that node's replacement.
    // Original nodes showing up mid-walk are skipped, never mutated.
    let originals: HashSet<usize> = mapping.keys().copied().collect();
    let transformed = mapping[&root.id()].clone();
    loop {
        let mut changed = false;
        for parent in all_parsers(&transformed) {
            if originals.contains(&parent.id()) {
                continue;
            }
            for child in parent.children() {
                if let Some(replacement) = mapping.get(&child.id()) {
                    if !child.ptr_eq(replacement) {
                        parent.replace(&child, replacement);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    transformed
}

/// Rewrites every child pointer past chains of setable indirections to the
/// ultimate non-setable target, then resolves `root` itself. A chain that
/// cycles back into itself is left in place.
pub fn remove_setables(root: &Parser) -> Parser {
    for parent in all_parsers(root) {
        for child in parent.children() {
            let target = resolve(&child);
            if !target.ptr_eq(&child) {
                parent.replace(&child, &target);
            }
        }
    }
    resolve(root)
}

fn resolve(parser: &Parser) -> Parser {
    let mut seen = vec![parser.id()];
    let mut current = parser.clone();
    loop {
        let next = match current.setable_child() {
            Some(child) => child,
            None => return current,
        };
        if seen.contains(&next.id()) {
            // a cycle of setables, leave untouched
            return parser.clone();
        }
        seen.push(next.id());
        current = next;
    }
}

/// Rewires children that are structurally equal to an already-seen parser
/// onto that canonical node, shrinking the reachable set while preserving
/// acceptance.
pub fn remove_duplicates(root: &Parser) -> Parser {
    let mut canonical: Vec<Parser> = Vec::new();
    for parent in all_parsers(root) {
        for child in parent.children() {
            let replacement = canonical
                .iter()
                .find(|candidate| !candidate.ptr_eq(&child) && candidate.structural_eq(&child))
                .cloned();
            match replacement {
                Some(replacement) => parent.replace(&child, &replacement),
                None => canonical.push(child),
            }
        }
    }
    root.clone()
}
