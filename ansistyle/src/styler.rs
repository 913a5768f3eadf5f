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

use crate::code::{ColorRole, SgrCode};
use crate::color::{ColorMapper, ColorMetric, Rgb};
use crate::config::StyleConfig;
use crate::encoder::{encode_occurrences, encode_runs, encode_runs_into};
use crate::result::StyleResult;
use crate::runs::{build_runs, ends_formatting};
use crate::tokenizer::{Occurrence, Tokenized, tokenize};
use crate::utility::StyledText;
use bytes::BufMut;
use tracing::instrument;

/// Converts between SGR escaped text and [`StyledText`].
///
/// The styler owns a [`StyleConfig`] that may be changed between calls
/// through [`AnsiStyler::config_mut`]. Each call reads the config once and
/// keeps no state afterwards.
///
/// # Examples
///
/// ```
/// use ansistyle::{AnsiStyler, Attribute, Rgb, StyleRun};
///
/// let styler = AnsiStyler::default();
/// let styled = styler.parse("plain \x1b[31mred\x1b[0m plain").unwrap();
/// assert_eq!(styled.text(), "plain red plain");
/// assert_eq!(
///     styled.runs(),
///     &[StyleRun::new(6..9, Attribute::Foreground(Rgb::new(255, 0, 0)))]
/// );
///
/// let escaped = styler.render(&styled).unwrap();
/// assert_eq!(escaped, "plain \x1b[31mred\x1b[39m plain");
/// ```
#[derive(Clone, Debug, Default)]
pub struct AnsiStyler {
    config: StyleConfig,
}

impl AnsiStyler {
    pub fn new(config: StyleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StyleConfig {
        &mut self.config
    }

    /// Convert escaped text into styled text.
    ///
    /// # Errors
    ///
    /// Decoding is tolerant of malformed input; an error here indicates an
    /// internal inconsistency between the tokenizer and run builder.
    #[instrument(skip_all, fields(len = escaped.len()))]
    pub fn parse(&self, escaped: &str) -> StyleResult<StyledText> {
        let Tokenized { clean, occurrences } = tokenize(escaped);
        let len = clean.chars().count();
        let runs = build_runs(len, &occurrences, &self.mapper())?;
        Ok(StyledText::new(clean, runs))
    }

    /// Convert styled text into escaped text.
    ///
    /// # Errors
    ///
    /// Fails if the runs do not form a valid run set for the text, or a
    /// color cannot be matched because no palette colors are available.
    #[instrument(skip_all, fields(len = styled.text().len(), runs = styled.runs().len()))]
    pub fn render(&self, styled: &StyledText) -> StyleResult<String> {
        encode_runs(styled.text(), styled.runs(), &self.config)
    }

    /// Like [`AnsiStyler::render`], writing into a byte buffer.
    ///
    /// # Errors
    ///
    /// See [`AnsiStyler::render`].
    pub fn render_into<B: BufMut>(&self, styled: &StyledText, dst: &mut B) -> StyleResult<usize> {
        encode_runs_into(styled.text(), styled.runs(), &self.config, dst)
    }

    /// The clean string and code occurrences of escaped text.
    pub fn escape_codes(&self, escaped: &str) -> Tokenized {
        tokenize(escaped)
    }

    /// Insert code occurrences into a clean string.
    ///
    /// # Errors
    ///
    /// Fails if an occurrence lies past the end of `clean`.
    pub fn escaped_with_codes(&self, clean: &str, occurrences: &[Occurrence]) -> StyleResult<String> {
        encode_occurrences(clean, occurrences)
    }

    /// Whether `end` closes the formatting opened by `start`.
    pub fn ends_formatting(end: SgrCode, start: SgrCode) -> bool {
        ends_formatting(end, start)
    }

    /// The color displayed for a color code under the current config.
    pub fn color_for_code(&self, code: SgrCode) -> Option<Rgb> {
        self.mapper().color_for_code(code)
    }

    /// The code whose color equals `color` exactly, if any.
    pub fn code_for_color(&self, color: Rgb, role: ColorRole) -> Option<SgrCode> {
        self.mapper().code_for_color(color, role)
    }

    /// The code whose color is nearest to `color` under the configured metric.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyPalette`](crate::StyleError::EmptyPalette)
    /// if no color of `role` is available.
    pub fn closest_code_for_color(&self, color: Rgb, role: ColorRole) -> StyleResult<SgrCode> {
        self.mapper().closest_code_for_color(color, role)
    }

    /// The code whose color is nearest to `color` under `metric`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyPalette`](crate::StyleError::EmptyPalette)
    /// if no color of `role` is available.
    pub fn closest_code_for_color_with<M: ColorMetric + ?Sized>(
        &self,
        color: Rgb,
        role: ColorRole,
        metric: &M,
    ) -> StyleResult<SgrCode> {
        self.mapper().closest_code_for_color_with(color, role, metric)
    }

    fn mapper(&self) -> ColorMapper<'_> {
        ColorMapper::new(&self.config)
    }
}
