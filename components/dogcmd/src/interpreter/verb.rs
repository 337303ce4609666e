// External crates
use std::fmt;

/// Command registry. Every spelling a user may type resolves to exactly one
/// `Verb`; there is no runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Set a gauge to an absolute value: `gauge <name> <value>`
    Gauge,
    /// Add an arbitrary value to a counter: `count <name> <value>`
    Count,
    /// Add one to a counter: `incr <name>`
    Incr,
    /// Subtract one from a counter: `decr <name>`
    Decr,
    /// Pause before the next command: `sleep <duration>`
    Sleep,
    /// Force delivery of buffered metrics: `flush`
    Flush,
}

impl Verb {
    /// Resolve a token, including its single-letter alias.
    pub fn lookup(token: &str) -> Option<Self> {
        match token {
            "gauge" | "g" => Some(Verb::Gauge),
            "count" | "c" => Some(Verb::Count),
            "incr" | "i" => Some(Verb::Incr),
            "decr" | "d" => Some(Verb::Decr),
            "sleep" | "s" => Some(Verb::Sleep),
            "flush" | "f" => Some(Verb::Flush),
            _ => None,
        }
    }

    /// Number of operand tokens consumed after the verb itself.
    pub const fn arity(self) -> usize {
        match self {
            Verb::Gauge | Verb::Count => 2,
            Verb::Incr | Verb::Decr | Verb::Sleep => 1,
            Verb::Flush => 0,
        }
    }

    /// Canonical long spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Gauge => "gauge",
            Verb::Count => "count",
            Verb::Incr => "incr",
            Verb::Decr => "decr",
            Verb::Sleep => "sleep",
            Verb::Flush => "flush",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_and_short_forms_resolve_to_the_same_verb() {
        let pairs = [
            ("gauge", "g", Verb::Gauge),
            ("count", "c", Verb::Count),
            ("incr", "i", Verb::Incr),
            ("decr", "d", Verb::Decr),
            ("sleep", "s", Verb::Sleep),
            ("flush", "f", Verb::Flush),
        ];
        for (long, short, verb) in pairs {
            assert_eq!(Verb::lookup(long), Some(verb));
            assert_eq!(Verb::lookup(short), Some(verb));
            assert_eq!(verb.as_str(), long);
        }
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        for token in ["Gauge", "GAUGE", "gauges", " g", "", "increment", "timing", "histogram"] {
            assert_eq!(Verb::lookup(token), None, "{token:?} must not resolve");
        }
    }
}
