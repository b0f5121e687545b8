//! Heuristic value summaries for abstracts.
//!
//! [`summarize`] picks the one sentence of an abstract that best states its
//! contribution or outcome, strips academic filler from it, and phrases it as
//! `"This research ..."`. Selection is a fixed-priority decision table
//! ([`SELECTION_RULES`]) over a small set of trigger-word categories
//! ([`Category`]); the first rule whose sentence matches wins.
//!
//! ```
//! use paper_similarity::summary::summarize;
//!
//! let summary = summarize(
//!     "We propose a new method to improve throughput. Results show it is effective.",
//! );
//! assert_eq!(summary, "This research results show it is effective.");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Prefix applied to summaries that do not already start with "this".
pub const SUMMARY_PREFIX: &str = "This research ";

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static IMPROVES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)improv(e|es|ed|ing)|enhance[ds]?|better|faster|more efficient|boost(s|ed|ing)?")
        .unwrap()
});
static SOLVES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)solv(e|es|ed|ing)|address(es|ed|ing)?|tackle[ds]?|fix(es|ed|ing)?").unwrap()
});
static INTRODUCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)introduce[ds]?|present[ds]?|propose[ds]?|new|novel").unwrap()
});
static ENABLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)enable[ds]?|allow[ds]?|help[ds]?|support[ds]?|empower[ds]?").unwrap()
});
static DISCOVERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)discover(s|ed|y)|found|reveal(s|ed)|show(s|ed)|demonstrate[ds]?").unwrap()
});
static CONCLUSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)results show|demonstrate|prove").unwrap());
static IMPACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)benefit|impact|advantage|improve|enable|help|better|advance").unwrap()
});

/// Clean-up substitutions, applied in order. These are case-sensitive.
static CLEANUPS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\([^)]*\)", ""),
        (r"\[[^\]]*\]", ""),
        (r"(?:i\.e\.|e\.g\.,?|etc\.|et al\.),?\s*", ""),
        (r"significantly|substantially|notably|remarkably", "greatly"),
        (r"\b(?:proposed|novel|new)\s+", ""),
        (r"\b(?:framework|methodology|approach|technique)\b", "method"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Trigger-word categories a sentence can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// improve, enhance, better, faster, more efficient, boost
    Improves,
    /// solve, address, tackle, fix
    Solves,
    /// introduce, present, propose, new, novel
    Introduces,
    /// enable, allow, help, support, empower
    Enables,
    /// discover(y), found, reveal, show, demonstrate
    Discovers,
    /// "results show", demonstrate, prove
    Conclusion,
    /// benefit, impact, advantage, improve, enable, help, better, advance
    Impact,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Improves,
        Category::Solves,
        Category::Introduces,
        Category::Enables,
        Category::Discovers,
        Category::Conclusion,
        Category::Impact,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            Category::Improves => &IMPROVES,
            Category::Solves => &SOLVES,
            Category::Introduces => &INTRODUCES,
            Category::Enables => &ENABLES,
            Category::Discovers => &DISCOVERS,
            Category::Conclusion => &CONCLUSION,
            Category::Impact => &IMPACT,
        }
    }

    /// Whether the sentence contains one of this category's trigger words.
    pub fn matches(&self, sentence: &str) -> bool {
        self.pattern().is_match(sentence)
    }
}

/// Which sentences a selection rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only the last sentence
    Last,
    /// Only the first sentence
    First,
    /// Every sentence, in order; the first match wins
    Any,
}

/// One row of the selection decision table.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRule {
    /// Rule name, reported in [`Selection::rule`]
    pub name: &'static str,
    /// Sentences the rule looks at
    pub scope: Scope,
    /// A sentence qualifies if it matches any of these categories
    pub triggers: &'static [Category],
}

/// Selection rules in priority order.
pub const SELECTION_RULES: &[SelectionRule] = &[
    SelectionRule {
        name: "conclusion",
        scope: Scope::Last,
        triggers: &[Category::Improves, Category::Enables, Category::Conclusion],
    },
    SelectionRule {
        name: "purpose",
        scope: Scope::First,
        triggers: &[Category::Solves, Category::Introduces, Category::Enables],
    },
    SelectionRule {
        name: "impact",
        scope: Scope::Any,
        triggers: &[Category::Impact],
    },
];

/// Rule name reported when no rule matched and the first sentence is used.
pub const FALLBACK_RULE: &str = "first-sentence";

/// The sentence chosen for a summary and the rule that chose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection<'a> {
    /// The selected sentence, trimmed, with its terminal punctuation
    pub sentence: &'a str,
    /// Name of the winning rule, or [`FALLBACK_RULE`]
    pub rule: &'static str,
}

impl SelectionRule {
    fn qualifies(&self, sentence: &str) -> bool {
        self.triggers.iter().any(|c| c.matches(sentence))
    }

    fn select<'a>(&self, sentences: &[&'a str]) -> Option<&'a str> {
        match self.scope {
            Scope::Last => sentences.last().copied().filter(|s| self.qualifies(s)),
            Scope::First => sentences.first().copied().filter(|s| self.qualifies(s)),
            Scope::Any => sentences.iter().copied().find(|s| self.qualifies(s)),
        }
    }
}

/// Split text into trimmed sentences.
///
/// Sentences end at runs of `.`, `!` or `?`, which stay attached to the
/// sentence. Fragments with no content besides the terminator are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for end in SENTENCE_END.find_iter(text) {
        sentences.push(text[start..end.end()].trim());
        start = end.end();
    }
    sentences.push(text[start..].trim());

    sentences
        .into_iter()
        .filter(|s| !s.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?')).trim().is_empty())
        .collect()
}

/// Categories the sentence matches, in [`Category::ALL`] order.
pub fn categories(sentence: &str) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| c.matches(sentence))
        .collect()
}

/// Choose the most representative sentence of an abstract.
///
/// Returns `None` only when the abstract has no sentences at all.
pub fn select_sentence(abstract_text: &str) -> Option<Selection<'_>> {
    let sentences = split_sentences(abstract_text);
    let first = *sentences.first()?;

    let selection = SELECTION_RULES
        .iter()
        .find_map(|rule| {
            rule.select(&sentences).map(|sentence| Selection {
                sentence,
                rule: rule.name,
            })
        })
        .unwrap_or(Selection {
            sentence: first,
            rule: FALLBACK_RULE,
        });
    Some(selection)
}

/// Strip asides and filler from a sentence and simplify its wording.
pub fn clean_sentence(sentence: &str) -> String {
    let cleaned = CLEANUPS
        .iter()
        .fold(sentence.to_string(), |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        });
    WHITESPACE.replace_all(cleaned.trim(), " ").into_owned()
}

/// Produce a one-line value summary of an abstract.
///
/// Pure and deterministic. An abstract with no sentences is returned as is.
pub fn summarize(abstract_text: &str) -> String {
    let Some(selection) = select_sentence(abstract_text) else {
        return abstract_text.to_string();
    };

    let cleaned = clean_sentence(selection.sentence);
    if cleaned.to_lowercase().starts_with("this") {
        return cleaned;
    }

    let mut chars = cleaned.chars();
    let rest = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{}{}", SUMMARY_PREFIX, rest).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conclusion_in_last_sentence() {
        let text = "We propose a new method to improve throughput. Results show it is effective.";
        let selection = select_sentence(text).unwrap();
        assert_eq!(selection.rule, "conclusion");
        assert_eq!(selection.sentence, "Results show it is effective.");
        assert_eq!(summarize(text), "This research results show it is effective.");
    }

    #[test]
    fn test_last_sentence_beats_first() {
        let text = "We propose a compiler. It improves accuracy on every benchmark.";
        assert_eq!(
            summarize(text),
            "This research it improves accuracy on every benchmark."
        );
    }

    #[test]
    fn test_purpose_in_first_sentence() {
        let text = "We address the scheduling problem in clusters. Experiments were run on three datasets.";
        let selection = select_sentence(text).unwrap();
        assert_eq!(selection.rule, "purpose");
        assert_eq!(
            summarize(text),
            "This research we address the scheduling problem in clusters."
        );
    }

    #[test]
    fn test_impact_anywhere() {
        let text = "Cloud costs are rising. Our study quantifies the economic impact of idle servers. Data was collected in 2023.";
        let selection = select_sentence(text).unwrap();
        assert_eq!(selection.rule, "impact");
        assert_eq!(
            summarize(text),
            "This research our study quantifies the economic impact of idle servers."
        );
    }

    #[test]
    fn test_fallback_to_first_sentence() {
        let text = "Cloud costs are rising. Data was collected in 2023.";
        let selection = select_sentence(text).unwrap();
        assert_eq!(selection.rule, FALLBACK_RULE);
        assert_eq!(summarize(text), "This research cloud costs are rising.");
    }

    #[test]
    fn test_enables_in_last_sentence() {
        let text = "We study sparse graphs. The library allows streaming updates.";
        assert_eq!(categories("The library allows streaming updates."), vec![Category::Enables]);

        let selection = select_sentence(text).unwrap();
        assert_eq!(selection.rule, "conclusion");
        assert_eq!(
            summarize(text),
            "This research the library allows streaming updates."
        );
    }

    #[test]
    fn test_enables_in_first_sentence() {
        let text = "Our scheduler supports heterogeneous clusters. Experiments ran on three datasets.";
        assert_eq!(
            categories("Our scheduler supports heterogeneous clusters."),
            vec![Category::Enables]
        );

        let selection = select_sentence(text).unwrap();
        assert_eq!(selection.rule, "purpose");
        assert_eq!(
            summarize(text),
            "This research our scheduler supports heterogeneous clusters."
        );
    }

    #[test]
    fn test_keeps_sentence_starting_with_this() {
        let text = "This paper presents a compiler. It was tested.";
        assert_eq!(summarize(text), "This paper presents a compiler.");
    }

    #[test]
    fn test_cleanup_rules() {
        let text = "We propose a novel framework (NF) [3] that significantly reduces latency.";
        assert_eq!(
            summarize(text),
            "This research we propose a method that greatly reduces latency."
        );
    }

    #[test]
    fn test_clean_sentence_substitutions() {
        assert_eq!(clean_sentence("A proposed technique"), "A method");
        assert_eq!(clean_sentence("notably remarkably"), "greatly greatly");
        assert_eq!(clean_sentence("new approach, et al., etc. done"), "method, done");
        // Substitutions are case-sensitive
        assert_eq!(clean_sentence("Novel Framework"), "Novel Framework");
    }

    #[test]
    fn test_clean_sentence_collapses_whitespace() {
        // A plain trim would leave the gap where the aside was removed.
        assert_eq!(clean_sentence("A tool (TL) that works."), "A tool that works.");
        assert_eq!(clean_sentence("  We  built\n a   tool. "), "We built a tool.");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!! Three?! Four"),
            vec!["One.", "Two!!", "Three?!", "Four"]
        );
        assert_eq!(split_sentences("... First.  . Second."), vec!["First.", "Second."]);
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" ?! ").is_empty());
    }

    #[test]
    fn test_categories() {
        let found = categories("Our method enables faster training");
        assert!(found.contains(&Category::Improves));
        assert!(found.contains(&Category::Enables));
        assert!(found.contains(&Category::Impact));
        assert!(!found.contains(&Category::Solves));

        assert_eq!(categories("We discovered a flaw"), vec![Category::Discovers]);
        assert_eq!(categories("TACKLES it"), vec![Category::Solves]);
        assert!(categories("Nothing to see").is_empty());
    }

    #[test]
    fn test_rule_priority_order() {
        let names: Vec<&str> = SELECTION_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["conclusion", "purpose", "impact"]);
        assert_eq!(SELECTION_RULES[0].scope, Scope::Last);
        assert_eq!(SELECTION_RULES[1].scope, Scope::First);
        assert_eq!(SELECTION_RULES[2].scope, Scope::Any);
    }

    #[test]
    fn test_degenerate_abstracts() {
        assert_eq!(summarize(""), "");
        assert_eq!(summarize("..."), "...");
        assert_eq!(summarize("Hello"), "This research hello");
        assert_eq!(summarize("(Aside)."), "This research .");
    }

    #[test]
    fn test_deterministic() {
        let text = "We tackle sparse attention. Results demonstrate large gains.";
        assert_eq!(summarize(text), summarize(text));
    }

    #[test]
    fn test_never_empty_for_one_word_sentence() {
        for text in ["word", "Word.", "  word  ", "a.", "x! y?"] {
            assert!(!summarize(text).is_empty(), "empty summary for {:?}", text);
        }
    }
}
