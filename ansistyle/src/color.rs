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

//! Color values, the default palette, and code/color matching.
//!
//! Lookups consult the caller's [`ColorOverrides`] before the built-in
//! palette. An override shadows the palette entry for its code without
//! removing the code itself.

use crate::code::{AnsiColor, ColorRole, SgrCode};
use crate::config::StyleConfig;
use crate::result::{StyleError, StyleResult};
use std::collections::BTreeMap;
use tracing::trace;

/// A 24-bit RGB color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Rgb {
        Rgb { red, green, blue }
    }

    /// A neutral gray with all channels set to `level`.
    pub const fn gray(level: u8) -> Rgb {
        Rgb::new(level, level, level)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// The built-in value for a palette color. Both roles share values.
///
/// Standard colors are the pure primaries. Bright black is a 33.7% gray,
/// the other bright colors are their hue at 40% saturation and full
/// brightness, and bright white is plain white.
pub const fn default_color(color: AnsiColor) -> Rgb {
    match color {
        AnsiColor::Black => Rgb::BLACK,
        AnsiColor::Red => Rgb::new(255, 0, 0),
        AnsiColor::Green => Rgb::new(0, 255, 0),
        AnsiColor::Yellow => Rgb::new(255, 255, 0),
        AnsiColor::Blue => Rgb::new(0, 0, 255),
        AnsiColor::Magenta => Rgb::new(255, 0, 255),
        AnsiColor::Cyan => Rgb::new(0, 255, 255),
        AnsiColor::White => Rgb::WHITE,
        AnsiColor::BrightBlack => Rgb::gray(86),
        AnsiColor::BrightRed => Rgb::new(255, 153, 153),
        AnsiColor::BrightGreen => Rgb::new(153, 255, 153),
        AnsiColor::BrightYellow => Rgb::new(255, 255, 153),
        AnsiColor::BrightBlue => Rgb::new(153, 153, 255),
        AnsiColor::BrightMagenta => Rgb::new(255, 153, 255),
        AnsiColor::BrightCyan => Rgb::new(153, 255, 255),
        AnsiColor::BrightWhite => Rgb::WHITE,
    }
}

/// Caller-supplied colors keyed by color code.
///
/// Only foreground and background color codes can be keys, so every entry
/// carries its role through its code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorOverrides(BTreeMap<SgrCode, Rgb>);

impl ColorOverrides {
    pub fn new() -> ColorOverrides {
        ColorOverrides::default()
    }

    /// Builder form of [`ColorOverrides::set`].
    pub fn with(mut self, role: ColorRole, color: AnsiColor, value: Rgb) -> ColorOverrides {
        self.set(role, color, value);
        self
    }

    /// Override the color shown for `color` in `role`, returning the previous override.
    pub fn set(&mut self, role: ColorRole, color: AnsiColor, value: Rgb) -> Option<Rgb> {
        self.0.insert(SgrCode::color(role, color), value)
    }

    /// Override the color shown for a color code.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::NotAColorCode`] if `code` does not select a color.
    pub fn insert(&mut self, code: SgrCode, value: Rgb) -> StyleResult<Option<Rgb>> {
        match (code.role(), code.ansi_color()) {
            (Some(role), Some(color)) => Ok(self.set(role, color, value)),
            _ => Err(StyleError::NotAColorCode(code)),
        }
    }

    pub fn get(&self, code: SgrCode) -> Option<Rgb> {
        self.0.get(&code).copied()
    }

    pub fn remove(&mut self, code: SgrCode) -> Option<Rgb> {
        self.0.remove(&code)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (SgrCode, Rgb)> + '_ {
        self.0.iter().map(|(code, value)| (*code, *value))
    }

    /// Entries for one role in ascending code order.
    pub fn for_role(&self, role: ColorRole) -> impl Iterator<Item = (SgrCode, Rgb)> + '_ {
        self.iter().filter(move |(code, _)| code.role() == Some(role))
    }
}

impl FromIterator<(ColorRole, AnsiColor, Rgb)> for ColorOverrides {
    fn from_iter<T: IntoIterator<Item = (ColorRole, AnsiColor, Rgb)>>(iter: T) -> Self {
        let mut overrides = ColorOverrides::new();
        for (role, color, value) in iter {
            overrides.set(role, color, value);
        }
        overrides
    }
}

/// A distance between two colors used for nearest-color matching.
///
/// Only the ordering of distances matters, so implementations may return
/// squared or otherwise monotonic values.
pub trait ColorMetric {
    fn distance(&self, a: Rgb, b: Rgb) -> u32;
}

/// Squared Euclidean distance over the RGB channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean;

impl ColorMetric for Euclidean {
    fn distance(&self, a: Rgb, b: Rgb) -> u32 {
        let red = u32::from(a.red.abs_diff(b.red));
        let green = u32::from(a.green.abs_diff(b.green));
        let blue = u32::from(a.blue.abs_diff(b.blue));
        red * red + green * green + blue * blue
    }
}

/// Weighted Euclidean distance that scales the red and blue channels by the
/// mean red level. Low-cost approximation of perceived difference, after
/// <https://www.compuphase.com/cmetric.htm>.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedMean;

impl ColorMetric for RedMean {
    fn distance(&self, a: Rgb, b: Rgb) -> u32 {
        let red_mean = (u32::from(a.red) + u32::from(b.red)) / 2;
        let red = u32::from(a.red.abs_diff(b.red));
        let green = u32::from(a.green.abs_diff(b.green));
        let blue = u32::from(a.blue.abs_diff(b.blue));

        let red_weight = ((512 + red_mean) * red * red) >> 8;
        let green_weight = 4 * green * green;
        let blue_weight = ((767 - red_mean) * blue * blue) >> 8;

        red_weight + green_weight + blue_weight
    }
}

/// The built-in metrics selectable from [`StyleConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorDistance {
    /// [`Euclidean`]
    #[default]
    Euclidean,
    /// [`RedMean`]
    RedMean,
}

impl ColorMetric for ColorDistance {
    fn distance(&self, a: Rgb, b: Rgb) -> u32 {
        match self {
            ColorDistance::Euclidean => Euclidean.distance(a, b),
            ColorDistance::RedMean => RedMean.distance(a, b),
        }
    }
}

/// Resolves color codes to colors and colors back to codes.
///
/// A mapper borrows its configuration and is cheap to create per
/// conversion; the override table it sees is a read-only snapshot for the
/// mapper's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct ColorMapper<'a> {
    config: &'a StyleConfig,
}

impl<'a> ColorMapper<'a> {
    pub fn new(config: &'a StyleConfig) -> ColorMapper<'a> {
        ColorMapper { config }
    }

    /// The color displayed for a color code: the override if one is set,
    /// otherwise the default palette value.
    ///
    /// Returns `None` for codes that do not select a color, and for codes
    /// with no override when the default palette is disabled.
    pub fn color_for_code(&self, code: SgrCode) -> Option<Rgb> {
        let color = code.ansi_color()?;
        self.config.overrides.get(code).or_else(|| {
            self.config
                .use_default_palette
                .then(|| default_color(color))
        })
    }

    /// The first code of `role` whose color equals `color` exactly.
    ///
    /// Overrides are searched before the default palette, each in ascending
    /// code order. Palette entries shadowed by an override are not matched.
    pub fn code_for_color(&self, color: Rgb, role: ColorRole) -> Option<SgrCode> {
        self.config
            .overrides
            .for_role(role)
            .chain(self.unshadowed_defaults(role))
            .find(|(_, value)| *value == color)
            .map(|(code, _)| code)
    }

    /// The code of `role` whose color is nearest to `color` under the
    /// configured metric.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyPalette`] if no color of `role` is available.
    pub fn closest_code_for_color(&self, color: Rgb, role: ColorRole) -> StyleResult<SgrCode> {
        self.closest_code_for_color_with(color, role, &self.config.metric)
    }

    /// Like [`ColorMapper::closest_code_for_color`] with an explicit metric.
    ///
    /// Ties are broken by ascending code value.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyPalette`] if no color of `role` is available.
    pub fn closest_code_for_color_with<M: ColorMetric + ?Sized>(
        &self,
        color: Rgb,
        role: ColorRole,
        metric: &M,
    ) -> StyleResult<SgrCode> {
        let mut best: Option<(u32, SgrCode)> = None;
        for (code, value) in self.palette(role) {
            let distance = metric.distance(color, value);
            let closer = match best {
                None => true,
                Some((best_distance, best_code)) => {
                    distance < best_distance || (distance == best_distance && code < best_code)
                }
            };
            if closer {
                best = Some((distance, code));
            }
        }
        let (distance, code) = best.ok_or(StyleError::EmptyPalette { role })?;
        trace!(%color, %role, %code, distance, "closest palette code");
        Ok(code)
    }

    /// Resolve a color to a code, exactly if possible, otherwise nearest.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyPalette`] if no color of `role` is available.
    pub fn best_code_for_color(&self, color: Rgb, role: ColorRole) -> StyleResult<SgrCode> {
        match self.code_for_color(color, role) {
            Some(code) => Ok(code),
            None => self.closest_code_for_color(color, role),
        }
    }

    /// Every candidate of `role`, overrides first then unshadowed defaults.
    pub fn palette(&self, role: ColorRole) -> impl Iterator<Item = (SgrCode, Rgb)> + '_ {
        self.config
            .overrides
            .for_role(role)
            .chain(self.unshadowed_defaults(role))
    }

    fn unshadowed_defaults(&self, role: ColorRole) -> impl Iterator<Item = (SgrCode, Rgb)> + 'a {
        let config = self.config;
        AnsiColor::ALL
            .into_iter()
            .filter(move |_| config.use_default_palette)
            .map(move |color| (SgrCode::color(role, color), default_color(color)))
            .filter(move |(code, _)| config.overrides.get(*code).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> StyleConfig {
        StyleConfig::standard()
    }

    #[test]
    fn test_color_for_code_default_palette() {
        let config = standard();
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper.color_for_code(SgrCode::Foreground(AnsiColor::Red)),
            Some(Rgb::new(255, 0, 0))
        );
        assert_eq!(
            mapper.color_for_code(SgrCode::Background(AnsiColor::BrightBlack)),
            Some(Rgb::gray(86))
        );
        assert_eq!(mapper.color_for_code(SgrCode::Italic), None);
        assert_eq!(mapper.color_for_code(SgrCode::ForegroundReset), None);
    }

    #[test]
    fn test_color_for_code_prefers_override() {
        let mut config = standard();
        config
            .overrides
            .set(ColorRole::Foreground, AnsiColor::Red, Rgb::new(200, 10, 10));
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper.color_for_code(SgrCode::Foreground(AnsiColor::Red)),
            Some(Rgb::new(200, 10, 10))
        );
        // The background role keeps the default.
        assert_eq!(
            mapper.color_for_code(SgrCode::Background(AnsiColor::Red)),
            Some(Rgb::new(255, 0, 0))
        );
    }

    #[test]
    fn test_code_for_color_exact() {
        let config = standard();
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper.code_for_color(Rgb::new(0, 0, 255), ColorRole::Background),
            Some(SgrCode::Background(AnsiColor::Blue))
        );
        // White and bright white share a value; the lower code wins.
        assert_eq!(
            mapper.code_for_color(Rgb::WHITE, ColorRole::Foreground),
            Some(SgrCode::Foreground(AnsiColor::White))
        );
        assert_eq!(mapper.code_for_color(Rgb::gray(128), ColorRole::Foreground), None);
    }

    #[test]
    fn test_code_for_color_searches_overrides_first() {
        let mut config = standard();
        config
            .overrides
            .set(ColorRole::Foreground, AnsiColor::BrightRed, Rgb::new(255, 0, 0));
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper.code_for_color(Rgb::new(255, 0, 0), ColorRole::Foreground),
            Some(SgrCode::Foreground(AnsiColor::BrightRed))
        );
    }

    #[test]
    fn test_code_for_color_skips_shadowed_default() {
        let mut config = standard();
        config
            .overrides
            .set(ColorRole::Foreground, AnsiColor::Red, Rgb::new(1, 2, 3));
        let mapper = ColorMapper::new(&config);
        assert_eq!(mapper.code_for_color(Rgb::new(255, 0, 0), ColorRole::Foreground), None);
        assert_eq!(
            mapper.code_for_color(Rgb::new(1, 2, 3), ColorRole::Foreground),
            Some(SgrCode::Foreground(AnsiColor::Red))
        );
        assert_eq!(mapper.code_for_color(Rgb::new(1, 2, 3), ColorRole::Background), None);
    }

    #[test]
    fn test_closest_mid_gray_is_bright_black() {
        let config = standard();
        let mapper = ColorMapper::new(&config);
        for role in ColorRole::ALL {
            assert_eq!(
                mapper.closest_code_for_color(Rgb::gray(128), role).unwrap(),
                SgrCode::color(role, AnsiColor::BrightBlack)
            );
            assert_eq!(
                mapper
                    .closest_code_for_color_with(Rgb::gray(128), role, &RedMean)
                    .unwrap(),
                SgrCode::color(role, AnsiColor::BrightBlack)
            );
        }
    }

    #[test]
    fn test_closest_ties_break_on_lower_code() {
        let config = standard();
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper
                .closest_code_for_color(Rgb::new(250, 250, 250), ColorRole::Foreground)
                .unwrap(),
            SgrCode::Foreground(AnsiColor::White)
        );
    }

    #[test]
    fn test_closest_near_primary() {
        let config = standard();
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper
                .closest_code_for_color(Rgb::new(230, 20, 10), ColorRole::Foreground)
                .unwrap(),
            SgrCode::Foreground(AnsiColor::Red)
        );
        assert_eq!(
            mapper
                .closest_code_for_color(Rgb::new(150, 150, 250), ColorRole::Background)
                .unwrap(),
            SgrCode::Background(AnsiColor::BrightBlue)
        );
    }

    #[test]
    fn test_closest_considers_overrides() {
        let mut config = standard();
        config
            .overrides
            .set(ColorRole::Foreground, AnsiColor::Green, Rgb::new(120, 120, 120));
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper
                .closest_code_for_color(Rgb::gray(128), ColorRole::Foreground)
                .unwrap(),
            SgrCode::Foreground(AnsiColor::Green)
        );
    }

    #[test]
    fn test_closest_empty_palette_is_error() {
        let config = StyleConfig::overrides_only(ColorOverrides::new().with(
            ColorRole::Foreground,
            AnsiColor::Blue,
            Rgb::new(0, 0, 128),
        ));
        let mapper = ColorMapper::new(&config);
        assert_eq!(
            mapper
                .closest_code_for_color(Rgb::WHITE, ColorRole::Foreground)
                .unwrap(),
            SgrCode::Foreground(AnsiColor::Blue)
        );
        assert!(matches!(
            mapper.closest_code_for_color(Rgb::WHITE, ColorRole::Background),
            Err(StyleError::EmptyPalette {
                role: ColorRole::Background
            })
        ));
        assert_eq!(mapper.color_for_code(SgrCode::Foreground(AnsiColor::Red)), None);
    }

    #[test]
    fn test_override_insert_rejects_non_color() {
        let mut overrides = ColorOverrides::new();
        assert!(matches!(
            overrides.insert(SgrCode::ForegroundReset, Rgb::BLACK),
            Err(StyleError::NotAColorCode(SgrCode::ForegroundReset))
        ));
        assert_eq!(
            overrides
                .insert(SgrCode::Background(AnsiColor::Cyan), Rgb::BLACK)
                .unwrap(),
            None
        );
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_metrics() {
        assert_eq!(Euclidean.distance(Rgb::BLACK, Rgb::BLACK), 0);
        assert_eq!(Euclidean.distance(Rgb::BLACK, Rgb::new(3, 4, 0)), 25);
        assert_eq!(RedMean.distance(Rgb::WHITE, Rgb::WHITE), 0);
        assert!(RedMean.distance(Rgb::BLACK, Rgb::WHITE) > RedMean.distance(Rgb::BLACK, Rgb::gray(86)));
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(255, 153, 0).to_string(), "#ff9900");
    }
}
