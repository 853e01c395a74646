//! Bracket balance and angle-expression scanning for one cleaned line.
//!
//! `()`, `[]` and `{}` are matched on a stack. `<` starts an angle
//! expression only when followed by an identifier start; any other `<`
//! or `>` is a comparison operator and ignored.
//!
//! Angle expressions come in two modes:
//! - plain (`<SRC.NPC>`, `<DEF.F_<SRC.LANG>_X>`): only identifier
//!   characters and nested angle expressions may appear before the closing
//!   `>`. Any other character, or reaching end of line, is an error.
//! - evaluation (`<EVAL ...>`): a `>` closes only at parenthesis depth
//!   zero, when not part of `>=`, and when the next non-space character is
//!   a closer/separator (`)]},;`) or end of line. Reaching end of line
//!   consumes the rest of the line without an error.
//!
//! The evaluation rule is a best-effort heuristic, not a parser. It accepts
//! `<EVAL (<A> > <B>)>` and `<EVAL (a) </8>` while still rejecting a bare
//! `<SRC.NPC` with nothing to close it.

use thiserror::Error;

const EVAL_WORD: &[u8] = b"EVAL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Bracket findings. `Display` is the text after `SYNTAX: brackets -> `.
pub enum BracketError {
    #[error("unexpected closing '{0}'")]
    UnexpectedCloser(char),
    #[error("expected '{expected}' but found '{found}'")]
    Mismatch { expected: char, found: char },
    #[error("unclosed: {0}")]
    Unclosed(String),
    #[error("unclosed '<'")]
    UnclosedAngle,
}

enum Angle {
    Closed(usize),
    /// Evaluation expression ran to end of line.
    Open,
    Unterminated,
}

pub fn check_brackets(line: &str) -> Result<(), BracketError> {
    let b = line.as_bytes();
    let mut stack: Vec<u8> = Vec::with_capacity(8);
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'(' | b'[' | b'{' => stack.push(b[i]),
            b'<' if starts_token(b, i + 1) => match scan_angle(b, i) {
                Angle::Closed(end) => {
                    i = end + 1;
                    continue;
                }
                Angle::Open => break,
                Angle::Unterminated => return Err(BracketError::UnclosedAngle),
            },
            c @ (b')' | b']' | b'}') => {
                let open = stack
                    .pop()
                    .ok_or(BracketError::UnexpectedCloser(c as char))?;
                let expected = closer_of(open);
                if expected != c {
                    return Err(BracketError::Mismatch {
                        expected: expected as char,
                        found: c as char,
                    });
                }
            }
            _ => {}
        }
        i += 1;
    }
    if stack.is_empty() {
        return Ok(());
    }
    let pending = stack
        .iter()
        .map(|c| (*c as char).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(BracketError::Unclosed(pending))
}

fn closer_of(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

fn is_token_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
}

fn starts_token(b: &[u8], at: usize) -> bool {
    b.get(at).copied().is_some_and(is_token_start)
}

enum Mode {
    Plain,
    Eval { parens: usize },
}

/// `start` points at the opening `<`. Nesting is tracked on an explicit
/// frame stack, one `Mode` per open angle expression.
fn scan_angle(b: &[u8], start: usize) -> Angle {
    let mut frames: Vec<Mode> = Vec::new();
    let mut i = open_frame(b, start, &mut frames);
    while i < b.len() {
        let c = b[i];
        if c == b'<' && starts_token(b, i + 1) {
            i = open_frame(b, i, &mut frames);
            continue;
        }
        let Some(top) = frames.last_mut() else {
            break;
        };
        let closes = match top {
            Mode::Plain => match c {
                b'>' => true,
                c if is_token_char(c) => false,
                _ => return Angle::Unterminated,
            },
            Mode::Eval { parens } => match c {
                b'(' => {
                    *parens += 1;
                    false
                }
                b')' => {
                    *parens = parens.saturating_sub(1);
                    false
                }
                b'>' if b.get(i + 1) == Some(&b'=') => {
                    i += 2;
                    continue;
                }
                b'>' => *parens == 0 && closes_expression(b, i + 1),
                _ => false,
            },
        };
        if closes {
            frames.pop();
            if frames.is_empty() {
                return Angle::Closed(i);
            }
        }
        i += 1;
    }
    match frames.last() {
        Some(Mode::Eval { .. }) => Angle::Open,
        _ => Angle::Unterminated,
    }
}

/// Push the frame for the `<` at `at` and return the index after its word.
fn open_frame(b: &[u8], at: usize, frames: &mut Vec<Mode>) -> usize {
    let word_start = at + 1;
    let mut i = word_start;
    while i < b.len() && is_token_char(b[i]) {
        i += 1;
    }
    if b[word_start..i].eq_ignore_ascii_case(EVAL_WORD) {
        frames.push(Mode::Eval { parens: 0 });
    } else {
        frames.push(Mode::Plain);
    }
    i
}

fn closes_expression(b: &[u8], from: usize) -> bool {
    match b[from.min(b.len())..]
        .iter()
        .find(|c| !c.is_ascii_whitespace())
    {
        None => true,
        Some(c) => matches!(c, b')' | b']' | b'}' | b',' | b';'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_plain_brackets() {
        assert_eq!(check_brackets("IF (<SRC.NPC> && [1]) {x}"), Ok(()));
        assert_eq!(check_brackets("IF (<MOREY> > <MOREX>)"), Ok(()));
        assert_eq!(check_brackets("IF (<A> <= 3) && (<B> < 5)"), Ok(()));
    }

    #[test]
    fn test_mismatch_and_unexpected() {
        assert_eq!(
            check_brackets("IF (1]"),
            Err(BracketError::Mismatch {
                expected: ')',
                found: ']'
            })
        );
        assert_eq!(
            check_brackets("x)"),
            Err(BracketError::UnexpectedCloser(')'))
        );
    }

    #[test]
    fn test_unclosed_lists_pending_openers_in_order() {
        let err = check_brackets("ITEM={ random_food (1").unwrap_err();
        assert_eq!(err.to_string(), "unclosed: {, (");
    }

    #[test]
    fn test_unterminated_plain_angle() {
        assert_eq!(
            check_brackets("IF <SRC.NPC"),
            Err(BracketError::UnclosedAngle)
        );
    }

    #[test]
    fn test_plain_angle_rejects_non_token_characters() {
        for line in ["IF <SRC.NPC (1>", "IF <SRC.NPC && [x>", "IF <A <B> C>"] {
            assert_eq!(check_brackets(line), Err(BracketError::UnclosedAngle), "{}", line);
        }
    }

    #[test]
    fn test_deeply_nested_angles_do_not_exhaust_the_stack() {
        let open = format!("IF {}", "<a".repeat(400_000));
        assert_eq!(check_brackets(&open), Err(BracketError::UnclosedAngle));

        let closed = format!("IF {}{}", "<a".repeat(400_000), ">".repeat(400_000));
        assert_eq!(check_brackets(&closed), Ok(()));

        let eval = format!("X=<EVAL {}", "<EVAL (".repeat(200_000));
        assert_eq!(check_brackets(&eval), Ok(()));
    }

    #[test]
    fn test_nested_dynamic_name() {
        assert_eq!(
            check_brackets("SERV.LOG <DEF.F_MULTIS_<SRC.CTAG0.ACCOUNTLANG>_MULTI_CENTER>"),
            Ok(())
        );
    }

    #[test]
    fn test_eval_expressions() {
        let lines = [
            "SRC.ACT.MOREY=<EVAL ((<SRC.KILLS> >= 3) || (<SRC.KARMA> < -1000) || (<SRC.FLAGS>&002000000))>",
            "LOCAL.TEST=<EVAL (<MORE>)>/8",
            "LOCAL.TEST2=<EVAL (<MORE>)</8",
            "VAR.TEST=<EVAL (<MOREY> > <MOREX>)>",
            "VAR.TEST=<EVAL (<MOREY> <= <MOREX>)>",
            "VAR.X=<eval (a) </8>",
            "IF (<EVAL <ARGN> > 2>)",
        ];
        for line in lines {
            assert_eq!(check_brackets(line), Ok(()), "{}", line);
        }
    }

    #[test]
    fn test_eval_closer_lets_outer_brackets_continue() {
        assert_eq!(
            check_brackets("IF (<EVAL 1>) && (2"),
            Err(BracketError::Unclosed("(".into()))
        );
    }

    #[test]
    fn test_unterminated_angle_nested_in_eval() {
        assert_eq!(
            check_brackets("X=<EVAL <ARGN + 1"),
            Err(BracketError::UnclosedAngle)
        );
    }
}
