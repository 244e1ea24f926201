//! Checkpoint filename classification.
//!
//! A checkpoint name is a computation tag (`m`, `p`, `e` or `f`), one to three
//! digit groups separated by underscores, and an optional `.bu` backup suffix
//! with an optional generation number:
//!
//! ```text
//! [mpef] digit+ ('_' digit+){0,2} ( '.bu' digit* )?
//! ```
//!
//! Classification is a single pass over the bytes with no I/O.

/// Shortest name that can be a checkpoint (`p1_23` or `p1234`).
const MIN_NAME_LEN: usize = 5;

/// Most underscores allowed in the digit run.
const MAX_UNDERSCORES: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Tag,
    Lead,
    Digits { underscores: u8 },
    Underscore { underscores: u8 },
    Dot,
    DotB,
    Suffix,
    Generation,
}

impl State {
    fn step(self, byte: u8) -> Option<Self> {
        match (self, byte) {
            (Self::Tag, b'm' | b'p' | b'e' | b'f') => Some(Self::Lead),
            (Self::Lead, b'0'..=b'9') => Some(Self::Digits { underscores: 0 }),
            (Self::Digits { underscores }, b'0'..=b'9') => Some(Self::Digits { underscores }),
            (Self::Digits { underscores }, b'_') if underscores < MAX_UNDERSCORES => {
                Some(Self::Underscore {
                    underscores: underscores + 1,
                })
            }
            (Self::Digits { .. }, b'.') => Some(Self::Dot),
            (Self::Underscore { underscores }, b'0'..=b'9') => Some(Self::Digits { underscores }),
            (Self::Dot, b'b') => Some(Self::DotB),
            (Self::DotB, b'u') => Some(Self::Suffix),
            (Self::Suffix | Self::Generation, b'0'..=b'9') => Some(Self::Generation),
            _ => None,
        }
    }
}

/// Where a classified name ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Plain,
    Backup,
}

fn run(name: &str) -> Option<Ending> {
    if name.len() < MIN_NAME_LEN {
        return None;
    }
    let mut state = State::Tag;
    for &byte in name.as_bytes() {
        state = state.step(byte)?;
    }
    match state {
        State::Digits { .. } => Some(Ending::Plain),
        State::Suffix | State::Generation => Some(Ending::Backup),
        State::Tag | State::Lead | State::Underscore { .. } | State::Dot | State::DotB => None,
    }
}

/// Decide whether `name` is a plausible checkpoint file name.
///
/// Pure and case-sensitive.
#[must_use]
pub fn classify(name: &str) -> bool {
    run(name).is_some()
}

/// A directory entry accepted by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateFile {
    /// File name.
    pub name: String,
    /// Whether the name carries a `.bu` backup suffix.
    pub backup: bool,
}

impl CandidateFile {
    /// Classify `name`, returning a candidate when it is accepted.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        run(name).map(|ending| Self {
            name: name.to_string(),
            backup: ending == Ending::Backup,
        })
    }
}
