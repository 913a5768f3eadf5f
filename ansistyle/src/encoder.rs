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

//! Serializes style runs back into SGR escaped text.
//!
//! The encoder walks the text once. At every offset where a run starts or
//! ends it writes a single sequence taking the active codes from their
//! previous state to the new one. An ending attribute is cleared with its
//! own reset code; a full reset is written when italic ends (it has no
//! reset of its own) or when several attributes end at once and the full
//! reset plus the codes that stay active is shorter.

use crate::code::{Category, ColorRole, Intensity, SgrCode, Underline};
use crate::color::ColorMapper;
use crate::config::{DefaultStyle, StyleConfig};
use crate::consts::{CSI, PARAMETER_DELIMITER, SGR_TERMINATOR};
use crate::result::{StyleError, StyleResult};
use crate::runs::{Attribute, AttributeKind, StyleRun};
use crate::tokenizer::Occurrence;
use bytes::BufMut;
use std::fmt::Write;
use std::ops::Range;
use tracing::trace;

/// Categories in the order their codes are written.
const CATEGORIES: [Category; 5] = [
    Category::Intensity,
    Category::Italic,
    Category::Underline,
    Category::Foreground,
    Category::Background,
];

type Active = [Option<SgrCode>; CATEGORIES.len()];

/// A validated run with its resolved code.
#[derive(Clone, Debug)]
struct Lane {
    range: Range<usize>,
    kind: AttributeKind,
    code: SgrCode,
}

/// Encode `text` with `runs` applied as SGR escape sequences.
///
/// # Errors
///
/// Fails if a run is inverted, extends past the text, overlaps another run
/// of the same category, or needs a color when the palette is empty.
pub fn encode_runs(text: &str, runs: &[StyleRun], config: &StyleConfig) -> StyleResult<String> {
    let mut output = String::with_capacity(text.len() + runs.len() * 10);
    write_runs(&mut output, text, runs, config)?;
    Ok(output)
}

/// Encode directly into a byte buffer, returning the number of bytes written.
///
/// Runs are validated before anything is written, so a rejected run leaves
/// `dst` untouched.
///
/// # Errors
///
/// See [`encode_runs`]. Running out of buffer space is returned as
/// [`StyleError::Fmt`] with the output written so far left in `dst`.
pub fn encode_runs_into<B: BufMut>(
    text: &str,
    runs: &[StyleRun],
    config: &StyleConfig,
    dst: &mut B,
) -> StyleResult<usize> {
    let mut writer = BufWriter { dst, written: 0 };
    write_runs(&mut writer, text, runs, config)?;
    Ok(writer.written)
}

/// Adapts a [`BufMut`] to [`std::fmt::Write`].
struct BufWriter<'b, B> {
    dst: &'b mut B,
    written: usize,
}

impl<B: BufMut> Write for BufWriter<'_, B> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        if self.dst.remaining_mut() < s.len() {
            return Err(std::fmt::Error);
        }
        self.dst.put_slice(s.as_bytes());
        self.written += s.len();
        Ok(())
    }
}

/// Encode `text` with `runs` applied, writing to any formatter.
///
/// # Errors
///
/// See [`encode_runs`]; writer failures are returned as [`StyleError::Fmt`].
pub fn write_runs<W: Write>(
    writer: &mut W,
    text: &str,
    runs: &[StyleRun],
    config: &StyleConfig,
) -> StyleResult<()> {
    let len = text.chars().count();
    let mapper = ColorMapper::new(config);
    let lanes = build_lanes(len, runs, config, &mapper)?;

    let mut boundaries: Vec<usize> = lanes
        .iter()
        .flatten()
        .flat_map(|lane| [lane.range.start, lane.range.end])
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut chars = text.chars();
    let mut position = 0;
    let mut cursors = [0usize; CATEGORIES.len()];
    let mut active: Active = [None; CATEGORIES.len()];

    for boundary in boundaries {
        for ch in chars.by_ref().take(boundary - position) {
            writer.write_char(ch)?;
        }
        position = boundary;

        let next = active_at(&lanes, &mut cursors, boundary);
        let codes = transition(&active, &next);
        trace!(offset = boundary, ?codes, "style transition");
        write_sequence(writer, &codes)?;
        active = next;
    }
    writer.write_str(chars.as_str())?;
    Ok(())
}

/// Re-insert SGR codes into a clean string at their locations.
///
/// Codes sharing a location are written as one sequence, in their given
/// order. This is the inverse of [`tokenize`](crate::tokenize).
///
/// # Errors
///
/// Returns [`StyleError::RangeOutOfBounds`] if a location lies past the end
/// of `clean`.
pub fn encode_occurrences(clean: &str, occurrences: &[Occurrence]) -> StyleResult<String> {
    let len = clean.chars().count();
    let mut ordered = occurrences.to_vec();
    ordered.sort_by_key(|occurrence| occurrence.location);
    if let Some(last) = ordered.last()
        && last.location > len
    {
        return Err(StyleError::RangeOutOfBounds {
            range: last.location..last.location,
            max: len,
        });
    }

    let mut output = String::with_capacity(clean.len() + occurrences.len() * 5);
    let mut chars = clean.chars();
    let mut position = 0;
    for group in ordered.chunk_by(|a, b| a.location == b.location) {
        let location = group[0].location;
        output.extend(chars.by_ref().take(location - position));
        position = location;
        let codes: Vec<SgrCode> = group.iter().map(|occurrence| occurrence.code).collect();
        write_sequence(&mut output, &codes)?;
    }
    output.push_str(chars.as_str());
    Ok(output)
}

/// Write one SGR sequence holding `codes`. Writes nothing for no codes.
pub fn write_sequence<W: Write>(writer: &mut W, codes: &[SgrCode]) -> std::fmt::Result {
    let Some((first, rest)) = codes.split_first() else {
        return Ok(());
    };
    write!(writer, "{}{}", CSI, first)?;
    for code in rest {
        write!(writer, "{}{}", PARAMETER_DELIMITER, code)?;
    }
    writer.write_char(SGR_TERMINATOR)
}

/// The code that introduces an attribute. Colors are matched exactly when
/// possible and otherwise to the nearest palette entry.
///
/// # Errors
///
/// Returns [`StyleError::EmptyPalette`] if a color has no candidate codes.
pub fn code_for_attribute(attribute: Attribute, mapper: &ColorMapper<'_>) -> StyleResult<SgrCode> {
    Ok(match attribute {
        Attribute::Foreground(color) => mapper.best_code_for_color(color, ColorRole::Foreground)?,
        Attribute::Background(color) => mapper.best_code_for_color(color, ColorRole::Background)?,
        Attribute::Bold => SgrCode::Intensity(Intensity::Bold),
        Attribute::Faint => SgrCode::Intensity(Intensity::Faint),
        Attribute::Italic => SgrCode::Italic,
        Attribute::UnderlineSingle => SgrCode::Underline(Underline::Single),
        Attribute::UnderlineDouble => SgrCode::Underline(Underline::Double),
    })
}

fn slot(category: Category) -> usize {
    CATEGORIES
        .iter()
        .position(|candidate| *candidate == category)
        .unwrap_or_default()
}

fn is_default(attribute: Attribute, defaults: &DefaultStyle) -> bool {
    match attribute {
        Attribute::Foreground(color) => defaults.foreground == Some(color),
        Attribute::Background(color) => defaults.background == Some(color),
        _ => false,
    }
}

fn build_lanes(
    len: usize,
    runs: &[StyleRun],
    config: &StyleConfig,
    mapper: &ColorMapper<'_>,
) -> StyleResult<[Vec<Lane>; CATEGORIES.len()]> {
    let mut lanes: [Vec<Lane>; CATEGORIES.len()] = Default::default();
    for run in runs {
        if run.range.start > run.range.end {
            return Err(StyleError::InvalidRange {
                range: run.range.clone(),
            });
        }
        if run.range.end > len {
            return Err(StyleError::RangeOutOfBounds {
                range: run.range.clone(),
                max: len,
            });
        }
        if run.is_empty() || is_default(run.attribute, &config.default_style) {
            continue;
        }
        let kind = run.kind();
        lanes[slot(kind.category())].push(Lane {
            range: run.range.clone(),
            kind,
            code: code_for_attribute(run.attribute, mapper)?,
        });
    }

    for lane in lanes.iter_mut() {
        lane.sort_by_key(|run| run.range.start);
        if let Some(pair) = lane
            .windows(2)
            .find(|pair| pair[0].range.end > pair[1].range.start)
        {
            return Err(StyleError::OverlappingRuns {
                kind: pair[1].kind,
                first: pair[0].range.clone(),
                second: pair[1].range.clone(),
            });
        }
    }
    Ok(lanes)
}

fn active_at(lanes: &[Vec<Lane>], cursors: &mut [usize], offset: usize) -> Active {
    let mut active: Active = [None; CATEGORIES.len()];
    for (index, lane) in lanes.iter().enumerate() {
        let cursor = &mut cursors[index];
        while *cursor < lane.len() && lane[*cursor].range.end <= offset {
            *cursor += 1;
        }
        if let Some(run) = lane.get(*cursor)
            && run.range.start <= offset
        {
            active[index] = Some(run.code);
        }
    }
    active
}

fn transition(previous: &Active, next: &Active) -> Vec<SgrCode> {
    let mut fine = Vec::new();
    let mut fine_possible = true;
    let mut ending = 0;

    for (index, category) in CATEGORIES.iter().enumerate() {
        if previous[index].is_some() && next[index].is_none() {
            ending += 1;
            match category.reset_code() {
                Some(code) => fine.push(code),
                None => fine_possible = false,
            }
        }
    }
    for (index, code) in next.iter().enumerate() {
        if let Some(code) = code
            && previous[index] != Some(*code)
        {
            fine.push(*code);
        }
    }

    if fine_possible && ending < 2 {
        return fine;
    }
    let coarse: Vec<SgrCode> = std::iter::once(SgrCode::Reset)
        .chain(next.iter().flatten().copied())
        .collect();
    if fine_possible && sequence_len(&fine) <= sequence_len(&coarse) {
        fine
    } else {
        coarse
    }
}

fn sequence_len(codes: &[SgrCode]) -> usize {
    let digits: usize = codes.iter().map(|code| code.to_string().len()).sum();
    digits + codes.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::AnsiColor;
    use crate::color::Rgb;
    use bytes::BytesMut;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn encode(text: &str, runs: &[StyleRun]) -> String {
        encode_runs(text, runs, &StyleConfig::standard()).unwrap()
    }

    #[test]
    fn test_no_runs() {
        assert_eq!(encode("plain", &[]), "plain");
    }

    #[test]
    fn test_background_run() {
        let runs = [StyleRun::new(0..3, Attribute::Background(BLUE))];
        assert_eq!(encode("abc", &runs), "\x1b[44mabc\x1b[49m");
    }

    #[test]
    fn test_inner_run() {
        let runs = [StyleRun::new(6..9, Attribute::Foreground(RED))];
        assert_eq!(
            encode("plain red plain", &runs),
            "plain \x1b[31mred\x1b[39m plain"
        );
    }

    #[test]
    fn test_simultaneous_end_uses_full_reset() {
        let runs = [
            StyleRun::new(0..2, Attribute::Bold),
            StyleRun::new(0..2, Attribute::UnderlineSingle),
        ];
        assert_eq!(encode("ab", &runs), "\x1b[1;4mab\x1b[0m");
    }

    #[test]
    fn test_staggered_end_uses_specific_resets() {
        let runs = [
            StyleRun::new(0..4, Attribute::Bold),
            StyleRun::new(0..19, Attribute::UnderlineSingle),
        ];
        assert_eq!(
            encode("bothstillUnderlinedplain", &runs),
            "\x1b[1;4mboth\x1b[22mstillUnderlined\x1b[24mplain"
        );
    }

    #[test]
    fn test_italic_end_needs_full_reset() {
        let runs = [
            StyleRun::new(0..2, Attribute::Italic),
            StyleRun::new(0..4, Attribute::Foreground(RED)),
        ];
        assert_eq!(encode("abcd", &runs), "\x1b[3;31mab\x1b[0;31mcd\x1b[39m");
    }

    #[test]
    fn test_value_change_writes_only_new_code() {
        let runs = [
            StyleRun::new(0..2, Attribute::Foreground(RED)),
            StyleRun::new(2..4, Attribute::Foreground(BLUE)),
            StyleRun::new(0..1, Attribute::Bold),
            StyleRun::new(1..3, Attribute::Faint),
        ];
        assert_eq!(
            encode("abcd", &runs),
            "\x1b[1;31ma\x1b[2mb\x1b[34mc\x1b[22md\x1b[39m"
        );
    }

    #[test]
    fn test_adjacent_equal_runs_merge() {
        let runs = [
            StyleRun::new(0..2, Attribute::Italic),
            StyleRun::new(2..4, Attribute::Italic),
        ];
        assert_eq!(encode("abcd", &runs), "\x1b[3mabcd\x1b[0m");
    }

    #[test]
    fn test_unmatched_color_uses_closest() {
        let runs = [StyleRun::new(0..1, Attribute::Foreground(Rgb::gray(128)))];
        assert_eq!(encode("x", &runs), "\x1b[90mx\x1b[39m");
    }

    #[test]
    fn test_default_foreground_not_emitted() {
        let mut config = StyleConfig::standard();
        config.default_style.foreground = Some(Rgb::BLACK);
        let runs = [
            StyleRun::new(0..1, Attribute::Foreground(Rgb::BLACK)),
            StyleRun::new(1..2, Attribute::Foreground(RED)),
        ];
        assert_eq!(
            encode_runs("ab", &runs, &config).unwrap(),
            "a\x1b[31mb\x1b[39m"
        );
    }

    #[test]
    fn test_multibyte_text() {
        let runs = [StyleRun::new(1..2, Attribute::UnderlineDouble)];
        assert_eq!(encode("世界!", &runs), "世\x1b[21m界\x1b[24m!");
    }

    #[test]
    fn test_run_past_end_is_error() {
        let runs = [StyleRun::new(0..4, Attribute::Bold)];
        assert!(matches!(
            encode_runs("abc", &runs, &StyleConfig::standard()),
            Err(StyleError::RangeOutOfBounds { max: 3, .. })
        ));
    }

    #[test]
    fn test_inverted_run_is_error() {
        #[allow(clippy::reversed_empty_ranges)]
        let runs = [StyleRun::new(2..1, Attribute::Bold)];
        assert!(matches!(
            encode_runs("abc", &runs, &StyleConfig::standard()),
            Err(StyleError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_overlapping_runs_are_error() {
        let runs = [
            StyleRun::new(0..2, Attribute::Bold),
            StyleRun::new(1..3, Attribute::Faint),
        ];
        assert!(matches!(
            encode_runs("abc", &runs, &StyleConfig::standard()),
            Err(StyleError::OverlappingRuns {
                kind: AttributeKind::Faint,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_palette_is_error() {
        let config = StyleConfig::overrides_only(Default::default());
        let runs = [StyleRun::new(0..1, Attribute::Background(RED))];
        assert!(matches!(
            encode_runs("a", &runs, &config),
            Err(StyleError::EmptyPalette {
                role: ColorRole::Background
            })
        ));
    }

    #[test]
    fn test_encode_into_buffer() {
        let runs = [StyleRun::new(0..1, Attribute::Bold)];
        let mut buffer = BytesMut::new();
        let written = encode_runs_into("ab", &runs, &StyleConfig::standard(), &mut buffer).unwrap();
        assert_eq!(&buffer[..], b"\x1b[1ma\x1b[22mb");
        assert_eq!(written, buffer.len());
    }

    #[test]
    fn test_encode_into_appends_to_buffer() {
        let runs = [StyleRun::new(1..2, Attribute::Foreground(RED))];
        let mut buffer = BytesMut::from(&b">"[..]);
        let written = encode_runs_into("ab", &runs, &StyleConfig::standard(), &mut buffer).unwrap();
        assert_eq!(&buffer[..], b">a\x1b[31mb\x1b[39m");
        assert_eq!(written, buffer.len() - 1);
    }

    #[test]
    fn test_encode_into_rejected_runs_write_nothing() {
        let runs = [
            StyleRun::new(0..2, Attribute::Bold),
            StyleRun::new(1..3, Attribute::Faint),
        ];
        let mut buffer = BytesMut::new();
        assert!(matches!(
            encode_runs_into("abc", &runs, &StyleConfig::standard(), &mut buffer),
            Err(StyleError::OverlappingRuns { .. })
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_encode_into_full_buffer() {
        let runs = [StyleRun::new(0..2, Attribute::Bold)];
        let mut storage = [0u8; 4];
        let mut buffer = &mut storage[..];
        assert!(matches!(
            encode_runs_into("ab", &runs, &StyleConfig::standard(), &mut buffer),
            Err(StyleError::Fmt(_))
        ));
    }

    #[test]
    fn test_encode_occurrences() {
        let occurrences = [
            Occurrence::new(SgrCode::Foreground(AnsiColor::Red), 6),
            Occurrence::new(SgrCode::Reset, 9),
        ];
        assert_eq!(
            encode_occurrences("plain red plain", &occurrences).unwrap(),
            "plain \x1b[31mred\x1b[0m plain"
        );
    }

    #[test]
    fn test_encode_occurrences_groups_locations() {
        let occurrences = [
            Occurrence::new(SgrCode::Intensity(Intensity::Bold), 0),
            Occurrence::new(SgrCode::Underline(Underline::Single), 0),
            Occurrence::new(SgrCode::Reset, 4),
        ];
        assert_eq!(
            encode_occurrences("both", &occurrences).unwrap(),
            "\x1b[1;4mboth\x1b[0m"
        );
        assert!(matches!(
            encode_occurrences("both", &[Occurrence::new(SgrCode::Reset, 5)]),
            Err(StyleError::RangeOutOfBounds { max: 4, .. })
        ));
    }

    #[test]
    fn test_write_sequence() {
        let mut output = String::new();
        write_sequence(&mut output, &[]).unwrap();
        assert_eq!(output, "");
        write_sequence(&mut output, &[SgrCode::Reset, SgrCode::Background(AnsiColor::BrightRed)])
            .unwrap();
        assert_eq!(output, "\x1b[0;101m");
    }
}
