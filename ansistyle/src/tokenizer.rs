//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Extracts SGR codes from escaped text.
//!
//! A sequence is `ESC [ <params> m` where `<params>` is zero or more decimal
//! numbers separated by `;`. Every well-formed sequence is removed from the
//! text and each recognised parameter becomes an [`Occurrence`] located at
//! the offset of the clean string where the sequence stood. Anything that
//! does not complete as an SGR sequence is kept as literal text.
//!
//! Cleaning never produces a new sequence. When a prefix such as `ESC [ 3`
//! is cut short by the `ESC` of a complete sequence, that sequence is only
//! removed if the text after it cannot continue the prefix; otherwise it is
//! kept as literal text. Tokenizing a clean string again therefore returns
//! it unchanged.

use crate::code::SgrCode;
use crate::consts::{ESCAPE, INTRODUCER, PARAMETER_DELIMITER, SGR_TERMINATOR};
use tracing::debug;

/// An SGR code and the clean-string offset at which it applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occurrence {
    pub code: SgrCode,
    /// Offset, in characters, into the clean string
    pub location: usize,
}

impl Occurrence {
    pub fn new(code: SgrCode, location: usize) -> Occurrence {
        Occurrence { code, location }
    }
}

/// The result of tokenizing escaped text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokenized {
    /// The input with every SGR sequence removed
    pub clean: String,
    /// Codes in the order they appeared, with non-decreasing locations
    pub occurrences: Vec<Occurrence>,
}

impl Tokenized {
    /// Length of the clean string in characters.
    pub fn clean_len(&self) -> usize {
        self.clean.chars().count()
    }
}

/// Split escaped text into its clean string and SGR code occurrences.
pub fn tokenize(input: &str) -> Tokenized {
    let mut tokenizer = Tokenizer::with_capacity(input.len());
    for ch in input.chars() {
        tokenizer.next(ch);
    }
    tokenizer.finish()
}

/// Internal states of the tokenizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Plain text; `ESC` moves to `Escape`.
    Normal,
    /// After `ESC`; `[` moves to `Parameters`.
    Escape,
    /// Inside `ESC [`, accumulating digits and delimiters until `m`.
    Parameters,
}

struct Tokenizer {
    clean: String,
    /// Characters pushed to `clean` so far
    location: usize,
    occurrences: Vec<Occurrence>,
    /// Text of the sequence being read, returned to `clean` if it never completes
    pending: String,
    state: State,
    /// State of the prefix at the end of `clean` that was cut short by an `ESC`
    dangling: Option<State>,
    /// Sequences completed since `dangling` was set, waiting on the next literal
    deferred: Deferred,
}

/// Completed sequences whose removal depends on the next literal character.
#[derive(Debug, Default)]
struct Deferred {
    text: String,
    codes: Vec<SgrCode>,
}

impl Tokenizer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            clean: String::with_capacity(capacity),
            location: 0,
            occurrences: Vec::new(),
            pending: String::new(),
            state: State::Normal,
            dangling: None,
            deferred: Deferred::default(),
        }
    }

    fn next(&mut self, ch: char) {
        match self.state {
            State::Normal => {
                if ch == ESCAPE {
                    self.pending.push(ch);
                    self.state = State::Escape;
                } else {
                    self.push_literal(ch);
                }
            }
            State::Escape => {
                if ch == INTRODUCER {
                    self.pending.push(ch);
                    self.state = State::Parameters;
                } else {
                    self.abandon(Some(ch));
                    self.next(ch);
                }
            }
            State::Parameters => {
                if ch.is_ascii_digit() || ch == PARAMETER_DELIMITER {
                    self.pending.push(ch);
                } else if ch == SGR_TERMINATOR {
                    self.complete();
                } else {
                    self.abandon(Some(ch));
                    self.next(ch);
                }
            }
        }
    }

    fn finish(mut self) -> Tokenized {
        if self.state != State::Normal {
            debug!(pending = ?self.pending, "unterminated escape sequence kept as text");
            self.abandon(None);
        }
        if self.dangling.take().is_some() {
            self.commit_deferred();
        }
        Tokenized {
            clean: self.clean,
            occurrences: self.occurrences,
        }
    }

    fn push_literal(&mut self, ch: char) {
        if let Some(prefix) = self.dangling.take() {
            if continues_prefix(prefix, ch) {
                let deferred = std::mem::take(&mut self.deferred);
                debug!(text = ?deferred.text, "sequence would join a cut prefix, kept as text");
                for literal in deferred.text.chars() {
                    self.emit(literal);
                }
            } else {
                self.commit_deferred();
            }
        }
        self.emit(ch);
    }

    fn emit(&mut self, ch: char) {
        self.clean.push(ch);
        self.location += 1;
    }

    /// Return the pending text to the clean string. An `ESC` cutting the
    /// prefix short leaves it dangling at the end of `clean`.
    fn abandon(&mut self, cut_by: Option<char>) {
        let prefix = self.state;
        let pending = std::mem::take(&mut self.pending);
        for ch in pending.chars() {
            self.push_literal(ch);
        }
        if cut_by == Some(ESCAPE) {
            self.dangling = Some(prefix);
        }
        self.state = State::Normal;
    }

    fn complete(&mut self) {
        let parameters = &self.pending[ESCAPE.len_utf8() + INTRODUCER.len_utf8()..];
        let mut codes = Vec::new();
        if parameters.is_empty() {
            codes.push(SgrCode::Reset);
        } else {
            for parameter in parameters.split(PARAMETER_DELIMITER) {
                match parse_parameter(parameter) {
                    Some(code) => codes.push(code),
                    None => debug!(parameter, "dropping unrecognised SGR parameter"),
                }
            }
        }

        if self.dangling.is_some() {
            self.deferred.text.push_str(&self.pending);
            self.deferred.codes.extend(codes);
        } else {
            let location = self.location;
            self.occurrences
                .extend(codes.into_iter().map(|code| Occurrence::new(code, location)));
        }
        self.pending.clear();
        self.state = State::Normal;
    }

    fn commit_deferred(&mut self) {
        let deferred = std::mem::take(&mut self.deferred);
        let location = self.location;
        self.occurrences.extend(
            deferred
                .codes
                .into_iter()
                .map(|code| Occurrence::new(code, location)),
        );
    }
}

/// Whether `ch` would extend a prefix left in `prefix` state.
fn continues_prefix(prefix: State, ch: char) -> bool {
    match prefix {
        State::Normal => false,
        State::Escape => ch == INTRODUCER,
        State::Parameters => {
            ch.is_ascii_digit() || ch == PARAMETER_DELIMITER || ch == SGR_TERMINATOR
        }
    }
}

fn parse_parameter(parameter: &str) -> Option<SgrCode> {
    if parameter.is_empty() {
        return None;
    }
    let value = parameter.bytes().fold(0u32, |value, digit| {
        value
            .saturating_mul(10)
            .saturating_add(u32::from(digit - b'0'))
    });
    u8::try_from(value).ok().and_then(SgrCode::from_u8)
}
