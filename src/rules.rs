//! Declarative pattern rules.
//!
//! Scoring adjustments, gap checks, and polish rewrites are expressed as
//! data (`Rule`, `Rewrite`) and run through the small evaluators here, so
//! each table can be tested independently of the code that consumes it.

use regex::Regex;

/// Compile a built-in pattern.
pub fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

/// What makes a rule fire.
pub enum Trigger {
    /// Once, when the pattern matches anywhere.
    Matches(Regex),
    /// Once per non-overlapping match.
    EachMatch(Regex),
    /// Once, when the predicate holds.
    Predicate(fn(&str) -> bool),
}

/// A weighted adjustment applied when its trigger fires.
pub struct Rule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub weight: i32,
    /// Upper bound on the total contribution of this rule.
    pub cap: Option<i32>,
}

impl Rule {
    pub fn matches(name: &'static str, pattern: &str, weight: i32) -> Self {
        Self {
            name,
            trigger: Trigger::Matches(compile(pattern)),
            weight,
            cap: None,
        }
    }

    pub fn each_match(name: &'static str, pattern: &str, weight: i32) -> Self {
        Self {
            name,
            trigger: Trigger::EachMatch(compile(pattern)),
            weight,
            cap: None,
        }
    }

    pub fn when(name: &'static str, predicate: fn(&str) -> bool, weight: i32) -> Self {
        Self {
            name,
            trigger: Trigger::Predicate(predicate),
            weight,
            cap: None,
        }
    }

    pub fn capped(mut self, cap: i32) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Points this rule adds (or removes) for `text`.
    pub fn contribution(&self, text: &str) -> i32 {
        let raw = match &self.trigger {
            Trigger::Matches(re) => i32::from(re.is_match(text)) * self.weight,
            Trigger::EachMatch(re) => re.find_iter(text).count() as i32 * self.weight,
            Trigger::Predicate(f) => i32::from(f(text)) * self.weight,
        };
        match self.cap {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }
}

/// Sum `base` and every rule's contribution. No clamping.
pub fn evaluate(base: i32, rules: &[Rule], text: &str) -> i32 {
    base + rules.iter().map(|r| r.contribution(text)).sum::<i32>()
}

/// Names of the rules that contributed a non-zero amount.
pub fn fired<'r>(rules: &'r [Rule], text: &str) -> Vec<&'r str> {
    rules
        .iter()
        .filter(|r| r.contribution(text) != 0)
        .map(|r| r.name)
        .collect()
}

/// A pattern → replacement pair. Replacements may use `$1`-style groups.
pub struct Rewrite {
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl Rewrite {
    pub fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: compile(pattern),
            replacement,
        }
    }
}

/// Apply rewrites in order, each over the output of the previous one.
///
/// Returns the rewritten text and how many rewrites matched.
pub fn apply_rewrites(rewrites: &[Rewrite], text: &str) -> (String, usize) {
    let mut out = text.to_string();
    let mut hits = 0;
    for rw in rewrites {
        if rw.pattern.is_match(&out) {
            out = rw.pattern.replace_all(&out, rw.replacement).into_owned();
            hits += 1;
        }
    }
    (out, hits)
}
