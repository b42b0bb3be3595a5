//! Modifier resolution: rate and scale from the text trailing a pattern
//! constructor, e.g. `.fast(2).slow(3).scale("d:major")`.
//!
//! Only the first call of each modifier counts. Malformed arguments fall
//! back to the modifier's default value.

use tracing::debug;

use super::error::CompileError;
use super::lexer::Lexer;
use super::scale::{ScaleContext, ScaleTable};
use super::token::{Token, TokenKind};

/// Rate and scale attached to one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifiers {
    pub fast: f64,
    pub slow: f64,
    pub scale: Option<ScaleContext>,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            fast: 1.0,
            slow: 1.0,
            scale: None,
        }
    }
}

impl Modifiers {
    /// `fast / slow`, or 1 when that is not finite.
    pub fn rate(&self) -> f64 {
        let rate = self.fast / self.slow;
        if rate.is_finite() {
            rate
        } else {
            1.0
        }
    }
}

/// A `.name(args)` call located in modifier text.
#[derive(Debug, Clone, PartialEq)]
struct MethodCall<'t> {
    name: &'t str,
    /// Raw argument text between the parentheses.
    raw_args: &'t str,
    /// Tokens between the parentheses.
    args: &'t [Token],
    line: usize,
    col: usize,
}

/// Extract the rate modifiers and optional scale from modifier text.
pub fn resolve_modifiers(text: &str, scales: &ScaleTable) -> Modifiers {
    let tokens = scan(text);
    let calls = method_calls(text, &tokens);
    let mut modifiers = Modifiers::default();

    if let Some(call) = first_call(&calls, "fast") {
        modifiers.fast = numeric_arg(call, 1.0);
    }
    if let Some(call) = first_call(&calls, "slow") {
        modifiers.slow = numeric_arg(call, 1.0);
    }
    if let Some(call) = calls.iter().find(|c| c.name.eq_ignore_ascii_case("scale")) {
        if let [Token {
            kind: TokenKind::Str(spec),
            ..
        }] = call.args
        {
            modifiers.scale = Some(scales.resolve(spec));
        } else {
            debug!(args = call.raw_args, "ignoring .scale() without a string literal");
        }
    }

    modifiers
}

/// Tokenize as far as possible; an unterminated string ends the scan.
fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for token in Lexer::new(text) {
        match token {
            Ok(token) => tokens.push(token),
            Err(e) => {
                debug!(error = %e, "modifier text truncated at lex error");
                break;
            }
        }
    }
    tokens
}

fn method_calls<'t>(text: &'t str, tokens: &'t [Token]) -> Vec<MethodCall<'t>> {
    let mut calls = Vec::new();
    let mut i = 0;
    while i + 2 < tokens.len() {
        let (dot, name, open) = (&tokens[i], &tokens[i + 1], &tokens[i + 2]);
        let TokenKind::Ident(ident) = &name.kind else {
            i += 1;
            continue;
        };
        if dot.kind != TokenKind::Dot || open.kind != TokenKind::LParen {
            i += 1;
            continue;
        }
        let Some(close) = matching_paren(tokens, i + 2) else {
            break;
        };
        calls.push(MethodCall {
            name: ident.as_str(),
            raw_args: &text[open.end..tokens[close].start],
            args: &tokens[i + 3..close],
            line: name.line,
            col: name.col,
        });
        i += 3;
    }
    calls
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn first_call<'c, 't>(calls: &'c [MethodCall<'t>], name: &str) -> Option<&'c MethodCall<'t>> {
    calls.iter().find(|c| c.name == name)
}

fn numeric_arg(call: &MethodCall<'_>, fallback: f64) -> f64 {
    match parse_number_prefix(call.raw_args).filter(|v| v.is_finite()) {
        Some(value) => value,
        None => {
            let err = CompileError::modifier(
                format!(".{}() argument is not a number: '{}'", call.name, call.raw_args),
                call.line,
                call.col,
            );
            debug!(error = %err, fallback, "using default modifier value");
            fallback
        }
    }
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace
/// (`"2 "` → 2, `"1.5x"` → 1.5, `"x"` → `None`).
pub fn parse_number_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
