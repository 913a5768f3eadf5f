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

use crate::code::{Category, Intensity, Underline};
use crate::color::Rgb;
use crate::config::{DefaultStyle, StyleConfig};
use crate::result::{StyleError, StyleResult};
use crate::runs::{Attribute, StyleRun, merge_runs};
use std::ops::Range;

/// A clean string with style runs over its characters.
///
/// This is the rich-text side of the conversion: each run applies one
/// attribute to a character range, and offsets not covered by a run of
/// some kind take the default for that kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledText {
    text: String,
    runs: Vec<StyleRun>,
}

impl StyledText {
    /// Wrap text and runs without validating the runs.
    ///
    /// Invalid runs are reported when the text is encoded.
    pub fn new<S: Into<String>>(text: S, runs: Vec<StyleRun>) -> StyledText {
        StyledText {
            text: text.into(),
            runs,
        }
    }

    /// Unstyled text.
    pub fn plain<S: Into<String>>(text: S) -> StyledText {
        StyledText::new(text, Vec::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    pub fn into_parts(self) -> (String, Vec<StyleRun>) {
        (self.text, self.runs)
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Apply an attribute over `range`, replacing whatever attribute of the
    /// same category covered that part of the text.
    ///
    /// # Errors
    ///
    /// Fails if `range` is inverted or extends past the text.
    pub fn apply(&mut self, range: Range<usize>, attribute: Attribute) -> StyleResult<()> {
        self.clear(range.clone(), attribute.kind().category())?;
        if !range.is_empty() {
            self.runs.push(StyleRun::new(range, attribute));
        }
        Ok(())
    }

    /// Remove every attribute of `category` from `range`, splitting runs
    /// that extend beyond it.
    ///
    /// # Errors
    ///
    /// Fails if `range` is inverted or extends past the text.
    pub fn clear(&mut self, range: Range<usize>, category: Category) -> StyleResult<()> {
        self.check_range(&range)?;
        let mut runs = Vec::with_capacity(self.runs.len() + 1);
        for run in self.runs.drain(..) {
            // Case 1: different category, or no overlap with the range
            if run.kind().category() != category
                || range.end <= run.range.start
                || range.start >= run.range.end
            {
                runs.push(run);
                continue;
            }
            // Case 2: keep the parts outside the range
            if run.range.start < range.start {
                runs.push(StyleRun::new(run.range.start..range.start, run.attribute));
            }
            if range.end < run.range.end {
                runs.push(StyleRun::new(range.end..run.range.end, run.attribute));
            }
        }
        self.runs = runs;
        Ok(())
    }

    /// Mark `range` bold if `weight` reaches the configured bold threshold,
    /// otherwise clear its intensity.
    ///
    /// # Errors
    ///
    /// Fails if `range` is inverted or extends past the text.
    pub fn set_font_weight(
        &mut self,
        range: Range<usize>,
        weight: u8,
        config: &StyleConfig,
    ) -> StyleResult<()> {
        if config.is_bold_weight(weight) {
            self.apply(range, Attribute::Bold)
        } else {
            self.clear(range, Category::Intensity)
        }
    }

    /// The effective style of the character at `offset`.
    pub fn style_at(&self, offset: usize, defaults: &DefaultStyle) -> ResolvedStyle {
        let mut style = ResolvedStyle {
            foreground: defaults.foreground,
            background: defaults.background,
            ..ResolvedStyle::default()
        };
        for run in self.runs.iter().filter(|run| run.range.contains(&offset)) {
            match run.attribute {
                Attribute::Foreground(color) => style.foreground = Some(color),
                Attribute::Background(color) => style.background = Some(color),
                Attribute::Bold => style.intensity = Intensity::Bold,
                Attribute::Faint => style.intensity = Intensity::Faint,
                Attribute::Italic => style.italic = true,
                Attribute::UnderlineSingle => style.underline = Underline::Single,
                Attribute::UnderlineDouble => style.underline = Underline::Double,
            }
        }
        style
    }

    /// Merge touching runs of equal value and sort the runs.
    pub fn normalize(&mut self) {
        self.runs = merge_runs(&self.runs);
    }

    fn check_range(&self, range: &Range<usize>) -> StyleResult<()> {
        if range.start > range.end {
            return Err(StyleError::InvalidRange {
                range: range.clone(),
            });
        }
        let len = self.len();
        if range.end > len {
            return Err(StyleError::RangeOutOfBounds {
                range: range.clone(),
                max: len,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for StyledText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Every attribute in effect at one offset, with defaults filled in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResolvedStyle {
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub intensity: Intensity,
    pub italic: bool,
    pub underline: Underline,
}
