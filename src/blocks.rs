//! Control-block nesting and statement-level checks.
//!
//! `BlockStack` pairs openers with closers in LIFO order. Frames never
//! leak across section headers or triggers: callers `drain` the stack at
//! those boundaries and at end of file, reporting each residual frame at
//! its own opening line.

use crate::models::Category;
use thiserror::Error;

/// Opening keyword to its single expected closer.
const BLOCK_PAIRS: &[(&str, &str)] = &[
    ("IF", "ENDIF"),
    ("WHILE", "ENDWHILE"),
    ("FOR", "ENDFOR"),
    ("FORCHARS", "ENDFOR"),
    ("FORCHARMEMORYTYPE", "ENDFOR"),
    ("FORCONTTYPE", "ENDFOR"),
    ("FORCHARLAYER", "ENDFOR"),
    ("FORCLIENTS", "ENDFOR"),
    ("FORITEMS", "ENDFOR"),
    ("FOROBJS", "ENDFOR"),
    ("FORCONT", "ENDFOR"),
    ("FORCONTID", "ENDFOR"),
    ("FORPLAYERS", "ENDFOR"),
    ("FORINSTANCES", "ENDFOR"),
    ("DORAND", "ENDDO"),
    ("DOSWITCH", "ENDDO"),
    ("DOSELECT", "ENDDO"),
    ("BEGIN", "END"),
];

const ELSE_WORDS: &[&str] = &["ELSE", "ELIF", "ELSEIF"];

/// Loop openers that need an argument but have a generic message.
const FOR_ARG_WORDS: &[&str] = &[
    "FORCHARS",
    "FORITEMS",
    "FOROBJS",
    "FORCONT",
    "FORCONTID",
    "FORCONTTYPE",
    "FORINSTANCES",
    "FORCHARLAYER",
    "FORCHARMEMORYTYPE",
];

pub fn closer_for(opener: &str) -> Option<&'static str> {
    BLOCK_PAIRS
        .iter()
        .find(|(open, _)| *open == opener)
        .map(|(_, close)| *close)
}

/// Canonical closer for a keyword. `ENDO`/`ENDOR` are accepted spellings
/// of `ENDDO`.
pub fn normalize_closer(word: &str) -> Option<&'static str> {
    match word {
        "ENDIF" => Some("ENDIF"),
        "ENDWHILE" => Some("ENDWHILE"),
        "ENDFOR" => Some("ENDFOR"),
        "ENDDO" | "ENDO" | "ENDOR" => Some("ENDDO"),
        "END" => Some("END"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFrame {
    pub keyword: &'static str,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Pairing violations. `Display` is the issue text after `BLOCK: `.
pub enum BlockError {
    #[error("'{0}' without opening block.")]
    Orphan(String),
    #[error("mismatch. '{opener}' closed by '{closer}' (expected {expected}).")]
    Mismatch {
        opener: &'static str,
        closer: String,
        expected: &'static str,
    },
    #[error("'{0}' without matching IF.")]
    DanglingElse(String),
}

#[derive(Debug, Default)]
pub struct BlockStack {
    frames: Vec<BlockFrame>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one statement keyword (already uppercased).
    pub fn apply(&mut self, word: &str, line: usize) -> Result<(), BlockError> {
        if let Some(closer) = normalize_closer(word) {
            let frame = self
                .frames
                .pop()
                .ok_or_else(|| BlockError::Orphan(word.to_string()))?;
            let expected = closer_for(frame.keyword).unwrap_or("END");
            if closer != expected {
                return Err(BlockError::Mismatch {
                    opener: frame.keyword,
                    closer: word.to_string(),
                    expected,
                });
            }
            return Ok(());
        }
        if ELSE_WORDS.contains(&word) {
            return match self.frames.last() {
                Some(top) if top.keyword == "IF" => Ok(()),
                _ => Err(BlockError::DanglingElse(word.to_string())),
            };
        }
        if let Some((open, _)) = BLOCK_PAIRS.iter().find(|(open, _)| *open == word) {
            self.frames.push(BlockFrame {
                keyword: *open,
                line,
            });
            return Ok(());
        }
        Ok(())
    }

    /// Take every open frame, oldest first.
    pub fn drain(&mut self) -> Vec<BlockFrame> {
        std::mem::take(&mut self.frames)
    }
}

/// Argument and spelling checks on a single statement.
pub fn statement_issues(word: &str, has_args: bool) -> Vec<(Category, String)> {
    let mut out = Vec::new();
    match word {
        "DORAN" => out.push((
            Category::Typo,
            "TYPO: 'DORAN' found. Did you mean 'DORAND'?".to_string(),
        )),
        "EN" => out.push((
            Category::Typo,
            "TYPO: 'EN' found. Did you mean 'ENDO', 'ENDDO', or 'ENDIF'?".to_string(),
        )),
        _ => {}
    }
    if has_args {
        return out;
    }
    let logic = match word {
        "IF" | "ELSEIF" | "ELIF" => Some(format!("LOGIC: empty '{}' statement.", word)),
        "WHILE" => Some("LOGIC: WHILE missing condition.".to_string()),
        "FOR" => Some(
            "LOGIC: FOR missing expression (expected: FOR <expr>, FOR <start> <end>, or FOR <var> <start> <end>)."
                .to_string(),
        ),
        "DORAND" => Some("LOGIC: DORAND missing line count.".to_string()),
        "DOSWITCH" => Some("LOGIC: DOSWITCH missing line number.".to_string()),
        w if FOR_ARG_WORDS.contains(&w) => Some(format!("LOGIC: {} missing argument.", w)),
        _ => None,
    };
    if let Some(msg) = logic {
        out.push((Category::Logic, msg));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close_pairs() {
        let mut st = BlockStack::new();
        assert_eq!(st.apply("IF", 1), Ok(()));
        assert_eq!(st.apply("FORCHARS", 2), Ok(()));
        assert_eq!(st.apply("ENDFOR", 3), Ok(()));
        assert_eq!(st.apply("ELSE", 4), Ok(()));
        assert_eq!(st.apply("ENDIF", 5), Ok(()));
        assert!(st.drain().is_empty());
    }

    #[test]
    fn test_endo_spellings_close_do_blocks() {
        let mut st = BlockStack::new();
        st.apply("DORAND", 1).unwrap();
        assert_eq!(st.apply("ENDO", 4), Ok(()));
        st.apply("DOSWITCH", 5).unwrap();
        assert_eq!(st.apply("ENDOR", 8), Ok(()));
    }

    #[test]
    fn test_closer_without_opener() {
        let mut st = BlockStack::new();
        let err = st.apply("ENDIF", 3).unwrap_err();
        assert_eq!(err.to_string(), "'ENDIF' without opening block.");
    }

    #[test]
    fn test_mismatch_names_expected_closer() {
        let mut st = BlockStack::new();
        st.apply("WHILE", 1).unwrap();
        let err = st.apply("ENDIF", 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "mismatch. 'WHILE' closed by 'ENDIF' (expected ENDWHILE)."
        );
        // the mismatched frame is consumed
        assert!(st.drain().is_empty());
    }

    #[test]
    fn test_else_requires_if_on_top() {
        let mut st = BlockStack::new();
        assert!(matches!(st.apply("ELSE", 1), Err(BlockError::DanglingElse(_))));
        st.apply("IF", 2).unwrap();
        st.apply("FOR", 3).unwrap();
        assert!(matches!(st.apply("ELIF", 4), Err(BlockError::DanglingElse(_))));
        // else never mutates the stack
        assert_eq!(st.drain().len(), 2);
    }

    #[test]
    fn test_drain_keeps_opening_lines() {
        let mut st = BlockStack::new();
        st.apply("IF", 4).unwrap();
        st.apply("BEGIN", 9).unwrap();
        let frames = st.drain();
        assert_eq!(
            frames,
            vec![
                BlockFrame { keyword: "IF", line: 4 },
                BlockFrame { keyword: "BEGIN", line: 9 },
            ]
        );
        assert!(st.drain().is_empty());
    }

    #[test]
    fn test_statement_issues_missing_args_and_typos() {
        let msgs = |w: &str, a: bool| -> Vec<String> {
            statement_issues(w, a).into_iter().map(|(_, m)| m).collect()
        };
        assert_eq!(msgs("IF", false), vec!["LOGIC: empty 'IF' statement."]);
        assert!(msgs("IF", true).is_empty());
        assert_eq!(msgs("FOROBJS", false), vec!["LOGIC: FOROBJS missing argument."]);
        assert!(msgs("FORPLAYERS", false).is_empty());
        assert_eq!(statement_issues("DORAN", true)[0].0, Category::Typo);
        assert!(msgs("DOSWITCH", false)[0].contains("missing line number"));
    }
}
