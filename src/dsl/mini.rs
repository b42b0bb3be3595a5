//! Mini-notation tokenizer.
//!
//! Grammar of the supported subset, applied after [`normalize`]:
//!
//! ```text
//! sequence := unit*
//! unit     := (group | word) suffix*
//! group    := '[' (word | group)* ']'
//! suffix   := ('*' | '!') digits
//! word     := any run of characters other than space, '[' and ']'
//! ```
//!
//! Groups nested inside a group are flattened into the outer group's
//! tokens. Both suffixes repeat the unit as consecutive steps; a repeat
//! inside a group repeats the stacked token instead. Inside a group `~` and
//! `.` are ordinary tokens, left for the pitch resolver to judge.

use tracing::warn;

use super::ast::{Step, Unit};

/// Upper bound on a single `*n` / `!n` expansion. Larger counts are clamped
/// with a warning.
pub const MAX_REPEAT: usize = 1024;

/// Normalize a pattern body: collapse whitespace, turn commas into spaces,
/// flatten `<...>` alternation brackets into the surrounding stream, and
/// drop `@weight` annotations.
pub fn normalize(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ',' | '<' | '>' => out.push(' '),
            '@' if chars.peek().is_some_and(|&n| is_weight_char(n)) => {
                while chars.peek().is_some_and(|&n| is_weight_char(n)) {
                    chars.next();
                }
            }
            c if c.is_whitespace() => out.push(' '),
            c => out.push(c),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_weight_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Parse a pattern body into units.
pub fn parse(body: &str) -> Vec<Unit> {
    MiniParser::new(&normalize(body)).parse_sequence()
}

/// Parse a pattern body into the ordered steps of one cycle.
pub fn tokenize(body: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    for unit in parse(body) {
        unit.push_steps(&mut steps);
    }
    steps
}

struct MiniParser {
    chars: Vec<char>,
    pos: usize,
}

impl MiniParser {
    fn new(normalized: &str) -> Self {
        Self {
            chars: normalized.chars().collect(),
            pos: 0,
        }
    }

    fn parse_sequence(&mut self) -> Vec<Unit> {
        let mut units = Vec::new();
        loop {
            self.skip_spaces();
            let Some(c) = self.peek() else { break };
            match c {
                '[' => {
                    self.pos += 1;
                    let tokens = self.parse_group();
                    let group = if tokens.is_empty() {
                        Unit::Rest
                    } else {
                        Unit::Group(tokens)
                    };
                    units.push(self.parse_suffixes(group));
                }
                // Stray closing bracket.
                ']' => self.pos += 1,
                _ => {
                    let word = self.read_word();
                    units.push(word_unit(&word));
                }
            }
        }
        units
    }

    /// Parse group contents after the opening `[`. An unclosed group runs to
    /// the end of the body.
    fn parse_group(&mut self) -> Vec<String> {
        let mut tokens = Vec::new();
        loop {
            self.skip_spaces();
            let Some(c) = self.peek() else { break };
            match c {
                ']' => {
                    self.pos += 1;
                    break;
                }
                '[' => {
                    self.pos += 1;
                    let inner = Unit::Group(self.parse_group());
                    let unit = self.parse_suffixes(inner);
                    flatten_into(&unit, &mut tokens);
                }
                _ => {
                    let word = self.read_word();
                    flatten_into(&stacked_unit(&word), &mut tokens);
                }
            }
        }
        tokens
    }

    fn parse_suffixes(&mut self, mut unit: Unit) -> Unit {
        while let Some(op) = self.peek() {
            if op != '*' && op != '!' {
                break;
            }
            let digits: String = self.chars[self.pos + 1..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            let Ok(count) = digits.parse::<usize>() else {
                break;
            };
            self.pos += 1 + digits.len();
            unit = Unit::Repeat {
                unit: Box::new(unit),
                count: clamp_repeat(count),
            };
        }
        unit
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c == ' ' || c == '[' || c == ']' {
                break;
            }
            word.push(c);
            self.pos += 1;
        }
        word
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }
}

/// Interpret a bare word, peeling trailing `*n` / `!n` suffixes.
fn word_unit(word: &str) -> Unit {
    if let Some((base, count)) = split_repeat(word) {
        return Unit::Repeat {
            unit: Box::new(word_unit(base)),
            count,
        };
    }
    match word {
        "" | "." | "~" => Unit::Rest,
        _ => Unit::Word(word.to_string()),
    }
}

/// Interpret a word inside a group, where rest markers are kept as tokens.
fn stacked_unit(word: &str) -> Unit {
    if let Some((base, count)) = split_repeat(word) {
        return Unit::Repeat {
            unit: Box::new(stacked_unit(base)),
            count,
        };
    }
    Unit::Word(word.to_string())
}

fn clamp_repeat(count: usize) -> usize {
    if count > MAX_REPEAT {
        warn!(count, max = MAX_REPEAT, "clamping repeat count");
    }
    count.min(MAX_REPEAT)
}

fn split_repeat(word: &str) -> Option<(&str, usize)> {
    let head = word.trim_end_matches(|c: char| c.is_ascii_digit());
    if head.len() == word.len() {
        return None;
    }
    let base = head.strip_suffix('*').or_else(|| head.strip_suffix('!'))?;
    let count = word[head.len()..].parse::<usize>().ok()?;
    Some((base, clamp_repeat(count)))
}

fn flatten_into(unit: &Unit, tokens: &mut Vec<String>) {
    match unit {
        Unit::Rest => {}
        Unit::Word(token) => tokens.push(token.clone()),
        Unit::Group(inner) => tokens.extend(inner.iter().cloned()),
        Unit::Repeat { unit, count } => {
            for _ in 0..*count {
                flatten_into(unit, tokens);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_tokens(body: &str) -> Vec<Vec<String>> {
        tokenize(body).into_iter().map(|s| s.tokens).collect()
    }

    #[test]
    fn normalize_collapses_whitespace_and_commas() {
        assert_eq!(normalize("  bd \n\t sd,hh  "), "bd sd hh");
    }

    #[test]
    fn normalize_flattens_angle_brackets() {
        assert_eq!(normalize("<c e> g"), "c e g");
        assert_eq!(normalize("a<b c>"), "a b c");
    }

    #[test]
    fn normalize_strips_weights() {
        assert_eq!(normalize("bd@3 sd@1.5 hh"), "bd sd hh");
        assert_eq!(normalize("a @ b"), "a @ b");
    }

    #[test]
    fn plain_tokens_become_single_steps() {
        assert_eq!(
            step_tokens("c4 e4 g4"),
            vec![vec!["c4"], vec!["e4"], vec!["g4"]]
        );
    }

    #[test]
    fn rests_are_empty_steps() {
        let steps = tokenize("bd ~ . sd");
        assert_eq!(steps.len(), 4);
        assert!(steps[1].is_rest());
        assert!(steps[2].is_rest());
        assert!(!steps[3].is_rest());
    }

    #[test]
    fn group_is_one_stacked_step() {
        assert_eq!(
            step_tokens("bd [sd hh] bd sd"),
            vec![vec!["bd"], vec!["sd", "hh"], vec!["bd"], vec!["sd"]]
        );
    }

    #[test]
    fn empty_group_is_rest() {
        let steps = tokenize("[] bd");
        assert_eq!(steps.len(), 2);
        assert!(steps[0].is_rest());
    }

    #[test]
    fn star_repeats_token() {
        assert_eq!(
            step_tokens("bd*3 sd"),
            vec![vec!["bd"], vec!["bd"], vec!["bd"], vec!["sd"]]
        );
    }

    #[test]
    fn star_repeats_group() {
        assert_eq!(
            step_tokens("[bd sd]*2 hh"),
            vec![vec!["bd", "sd"], vec!["bd", "sd"], vec!["hh"]]
        );
    }

    #[test]
    fn bang_repeats_as_separate_steps() {
        assert_eq!(
            step_tokens("c!3 e"),
            vec![vec!["c"], vec!["c"], vec!["c"], vec!["e"]]
        );
    }

    #[test]
    fn bang_repeat_of_rest_keeps_slots() {
        let steps = tokenize("bd ~!2");
        assert_eq!(steps.len(), 3);
        assert!(steps[1].is_rest() && steps[2].is_rest());
    }

    #[test]
    fn fractional_tokens_are_not_repeats() {
        assert_eq!(step_tokens("0.5 2"), vec![vec!["0.5"], vec!["2"]]);
    }

    #[test]
    fn nested_groups_flatten() {
        assert_eq!(
            step_tokens("[a [b c]] d"),
            vec![vec!["a", "b", "c"], vec!["d"]]
        );
    }

    #[test]
    fn repeat_inside_group_stacks() {
        assert_eq!(step_tokens("[bd*2 sd]"), vec![vec!["bd", "bd", "sd"]]);
    }

    #[test]
    fn rest_markers_inside_group_are_tokens() {
        assert_eq!(step_tokens("[bd ~ sd]"), vec![vec!["bd", "~", "sd"]]);
        assert_eq!(step_tokens("[. c4]"), vec![vec![".", "c4"]]);
    }

    #[test]
    fn repeated_rest_marker_inside_group_stacks() {
        assert_eq!(step_tokens("[bd ~*2]"), vec![vec!["bd", "~", "~"]]);
    }

    #[test]
    fn unclosed_group_runs_to_end() {
        assert_eq!(step_tokens("a [b c"), vec![vec!["a"], vec!["b", "c"]]);
    }

    #[test]
    fn stray_close_bracket_is_ignored() {
        assert_eq!(step_tokens("a ] b"), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn zero_repeat_produces_nothing() {
        assert_eq!(step_tokens("bd*0 sd"), vec![vec!["sd"]]);
    }

    #[test]
    fn repeat_count_is_capped() {
        assert_eq!(tokenize("bd*99999999").len(), MAX_REPEAT);
        assert_eq!(tokenize("bd!2000").len(), MAX_REPEAT);
        assert_eq!(tokenize("[bd sd]*2000").len(), MAX_REPEAT);
        assert_eq!(tokenize("[bd*2000]")[0].tokens.len(), MAX_REPEAT);
    }

    #[test]
    fn repeat_count_at_cap_is_exact() {
        assert_eq!(tokenize("bd*1024").len(), 1024);
        assert_eq!(tokenize("bd*1000").len(), 1000);
    }

    #[test]
    fn empty_body_has_no_steps() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ").is_empty());
    }

    #[test]
    fn weights_do_not_add_steps() {
        assert_eq!(step_tokens("a@2 b"), vec![vec!["a"], vec!["b"]]);
    }
}
