//! Derives descriptive tags for a module from its bundled code.

use crate::model::{TagMergePolicy, TagRule};

pub trait Tagger: Send + Sync {
    /// Final tag list for a module given its bundled code and declared tags.
    fn tags(&self, code: &str, declared: &[String]) -> Vec<String>;
}

/// Built-in rules: a tag applies when the code contains any of its patterns.
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    (
        "themes",
        &[
            "createElement(\"style\")",
            "createElement('style')",
            "adoptedStyleSheets",
        ],
    ),
    ("commands", &["commands.add", "registerCommand"]),
    (
        "settings",
        &["settings.createItem", "settings.items", "registerSettings"],
    ),
    ("patches", &["patcher.patch", "patcher.inject", "monkeyPatch"]),
    ("notifications", &["showToast", "Notification("]),
    ("messages", &["sendMessage", "getMessages", "MESSAGE_CREATE"]),
    ("ui", &["ReactDOM", "createElement(\"div\")", "createElement('div')"]),
    ("network", &["fetch(", "XMLHttpRequest", "WebSocket("]),
    ("storage", &["localStorage", "indexedDB"]),
];

/// Substring-matching tagger over a rule table.
#[derive(Debug, Clone)]
pub struct KeywordTagger {
    rules: Vec<TagRule>,
    policy: TagMergePolicy,
}

impl KeywordTagger {
    /// Built-in rules followed by `extra`.
    pub fn new(extra: &[TagRule], policy: TagMergePolicy) -> Self {
        let mut rules: Vec<TagRule> = DEFAULT_RULES
            .iter()
            .map(|(tag, patterns)| TagRule {
                tag: tag.to_string(),
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
            })
            .collect();
        rules.extend(extra.iter().cloned());
        Self { rules, policy }
    }

    fn infer(&self, code: &str) -> Vec<String> {
        let mut inferred = Vec::new();
        for rule in &self.rules {
            if rule.patterns.iter().any(|p| code.contains(p.as_str())) {
                push_unique(&mut inferred, &rule.tag);
            }
        }
        inferred
    }
}

impl Tagger for KeywordTagger {
    fn tags(&self, code: &str, declared: &[String]) -> Vec<String> {
        match self.policy {
            TagMergePolicy::DeclaredOnly => dedup(declared),
            TagMergePolicy::InferredOnly => self.infer(code),
            TagMergePolicy::Union => {
                let mut tags = dedup(declared);
                for tag in self.infer(code) {
                    push_unique(&mut tags, &tag);
                }
                tags
            }
        }
    }
}

fn dedup(tags: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        push_unique(&mut out, tag);
    }
    out
}

// case-insensitive, keeps the first spelling seen
fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
        tags.push(tag.to_string());
    }
}
