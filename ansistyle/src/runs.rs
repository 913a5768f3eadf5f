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

//! Builds style runs from SGR code occurrences.
//!
//! At most one run per [`AttributeKind`] is open at any time. Each
//! occurrence first closes every open run it terminates, according to
//! [`ends_formatting`], and then opens a run for the attribute it
//! introduces, if any. Runs still open at the end of input close at the
//! end of the clean string. Zero-length runs are never emitted.

use crate::code::{Category, ColorRole, Intensity, SgrCode, Underline};
use crate::color::{ColorMapper, Rgb};
use crate::result::{StyleError, StyleResult};
use crate::tokenizer::Occurrence;
use std::ops::Range;
use tracing::{trace, warn};

/// The kinds of attribute a style run can carry.
///
/// Runs of the same kind never overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    Foreground,
    Background,
    Bold,
    Faint,
    Italic,
    UnderlineSingle,
    UnderlineDouble,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 7] = [
        AttributeKind::Foreground,
        AttributeKind::Background,
        AttributeKind::Bold,
        AttributeKind::Faint,
        AttributeKind::Italic,
        AttributeKind::UnderlineSingle,
        AttributeKind::UnderlineDouble,
    ];

    /// The kind of run a code opens. Pure reset codes open nothing.
    pub fn introduced_by(code: SgrCode) -> Option<AttributeKind> {
        match code {
            SgrCode::Foreground(_) => Some(AttributeKind::Foreground),
            SgrCode::Background(_) => Some(AttributeKind::Background),
            SgrCode::Intensity(Intensity::Bold) => Some(AttributeKind::Bold),
            SgrCode::Intensity(Intensity::Faint) => Some(AttributeKind::Faint),
            SgrCode::Italic => Some(AttributeKind::Italic),
            SgrCode::Underline(Underline::Single) => Some(AttributeKind::UnderlineSingle),
            SgrCode::Underline(Underline::Double) => Some(AttributeKind::UnderlineDouble),
            SgrCode::Reset
            | SgrCode::Intensity(Intensity::Normal)
            | SgrCode::Underline(Underline::Disabled)
            | SgrCode::ForegroundReset
            | SgrCode::BackgroundReset => None,
        }
    }

    /// The code category that sets and clears this kind. Bold and faint
    /// share intensity, and the two underline kinds share underline, so
    /// kinds in one category are mutually exclusive.
    pub fn category(&self) -> Category {
        match self {
            AttributeKind::Foreground => Category::Foreground,
            AttributeKind::Background => Category::Background,
            AttributeKind::Bold | AttributeKind::Faint => Category::Intensity,
            AttributeKind::Italic => Category::Italic,
            AttributeKind::UnderlineSingle | AttributeKind::UnderlineDouble => Category::Underline,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A formatting attribute with its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Foreground(Rgb),
    Background(Rgb),
    Bold,
    Faint,
    Italic,
    UnderlineSingle,
    UnderlineDouble,
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Foreground(_) => AttributeKind::Foreground,
            Attribute::Background(_) => AttributeKind::Background,
            Attribute::Bold => AttributeKind::Bold,
            Attribute::Faint => AttributeKind::Faint,
            Attribute::Italic => AttributeKind::Italic,
            Attribute::UnderlineSingle => AttributeKind::UnderlineSingle,
            Attribute::UnderlineDouble => AttributeKind::UnderlineDouble,
        }
    }

    /// The color and its role, for color attributes.
    pub fn color(&self) -> Option<(ColorRole, Rgb)> {
        match self {
            Attribute::Foreground(color) => Some((ColorRole::Foreground, *color)),
            Attribute::Background(color) => Some((ColorRole::Background, *color)),
            _ => None,
        }
    }
}

/// An attribute applied over a range of the clean string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleRun {
    /// Half-open character range
    pub range: Range<usize>,
    pub attribute: Attribute,
}

impl StyleRun {
    pub fn new(range: Range<usize>, attribute: Attribute) -> StyleRun {
        StyleRun { range, attribute }
    }

    pub fn kind(&self) -> AttributeKind {
        self.attribute.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }
}

/// Whether an occurrence of `end` closes the run opened by `start`.
///
/// A full reset ends everything. Otherwise a code only ends runs of its
/// own category: any color or color reset of the same role ends a color
/// run, any intensity code ends bold or faint, any underline code ends an
/// underline, and a further italic ends italic.
pub fn ends_formatting(end: SgrCode, start: SgrCode) -> bool {
    match (end, start) {
        (SgrCode::Reset, _) => true,
        (SgrCode::Foreground(_) | SgrCode::ForegroundReset, SgrCode::Foreground(_)) => true,
        (SgrCode::Background(_) | SgrCode::BackgroundReset, SgrCode::Background(_)) => true,
        (SgrCode::Intensity(_), SgrCode::Intensity(Intensity::Bold | Intensity::Faint)) => true,
        (SgrCode::Italic, SgrCode::Italic) => true,
        (SgrCode::Underline(_), SgrCode::Underline(Underline::Single | Underline::Double)) => true,
        _ => false,
    }
}

#[derive(Clone, Copy, Debug)]
struct OpenRun {
    start: usize,
    code: SgrCode,
    attribute: Attribute,
}

/// Build the style runs for a clean string of `len` characters.
///
/// Occurrences are processed in location order, keeping their given order
/// for equal locations. The result is sorted by start, then kind.
///
/// # Errors
///
/// Returns [`StyleError::RangeOutOfBounds`] if an occurrence lies past `len`.
pub fn build_runs(
    len: usize,
    occurrences: &[Occurrence],
    mapper: &ColorMapper<'_>,
) -> StyleResult<Vec<StyleRun>> {
    let mut ordered: Vec<&Occurrence> = occurrences.iter().collect();
    ordered.sort_by_key(|occurrence| occurrence.location);

    let mut open: [Option<OpenRun>; 7] = [None; 7];
    let mut runs = Vec::new();

    for occurrence in ordered {
        let location = occurrence.location;
        if location > len {
            return Err(StyleError::RangeOutOfBounds {
                range: location..location,
                max: len,
            });
        }

        for slot in open.iter_mut() {
            if let Some(run) = slot
                && ends_formatting(occurrence.code, run.code)
            {
                close(&mut runs, *run, location);
                *slot = None;
            }
        }

        let Some(kind) = AttributeKind::introduced_by(occurrence.code) else {
            continue;
        };
        let Some(attribute) = attribute_for(occurrence.code, mapper) else {
            warn!(code = %occurrence.code, "no color available for code, run skipped");
            continue;
        };
        if let Some(previous) = open[kind.index()].take() {
            close(&mut runs, previous, location);
        }
        trace!(code = %occurrence.code, location, "opening run");
        open[kind.index()] = Some(OpenRun {
            start: location,
            code: occurrence.code,
            attribute,
        });
    }

    for run in open.into_iter().flatten() {
        close(&mut runs, run, len);
    }

    runs.sort_by_key(|run| (run.range.start, run.kind(), run.range.end));
    Ok(runs)
}

fn close(runs: &mut Vec<StyleRun>, run: OpenRun, end: usize) {
    if run.start == end {
        return;
    }
    trace!(code = %run.code, start = run.start, end, "closing run");
    runs.push(StyleRun::new(run.start..end, run.attribute));
}

fn attribute_for(code: SgrCode, mapper: &ColorMapper<'_>) -> Option<Attribute> {
    match code {
        SgrCode::Foreground(_) => mapper.color_for_code(code).map(Attribute::Foreground),
        SgrCode::Background(_) => mapper.color_for_code(code).map(Attribute::Background),
        SgrCode::Intensity(Intensity::Bold) => Some(Attribute::Bold),
        SgrCode::Intensity(Intensity::Faint) => Some(Attribute::Faint),
        SgrCode::Italic => Some(Attribute::Italic),
        SgrCode::Underline(Underline::Single) => Some(Attribute::UnderlineSingle),
        SgrCode::Underline(Underline::Double) => Some(Attribute::UnderlineDouble),
        _ => None,
    }
}

/// Join touching runs of the same kind and value, and drop empty runs.
///
/// The result is sorted like the output of [`build_runs`].
pub fn merge_runs(runs: &[StyleRun]) -> Vec<StyleRun> {
    let mut sorted: Vec<StyleRun> = runs.iter().filter(|run| !run.is_empty()).cloned().collect();
    sorted.sort_by_key(|run| (run.kind(), run.range.start, run.range.end));

    let mut merged: Vec<StyleRun> = Vec::with_capacity(sorted.len());
    for run in sorted {
        match merged.last_mut() {
            Some(last) if last.attribute == run.attribute && last.range.end == run.range.start => {
                last.range.end = run.range.end;
            }
            _ => merged.push(run),
        }
    }

    merged.sort_by_key(|run| (run.range.start, run.kind(), run.range.end));
    merged
}
