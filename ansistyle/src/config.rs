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

use crate::color::{ColorDistance, ColorOverrides, Rgb};
use crate::consts::BOLD_FONT_MIN_WEIGHT;

/// Conversion settings passed into every styling operation.
///
/// The owner may change any field between conversions. A conversion only
/// borrows the config, so it always sees one consistent snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleConfig {
    /// Colors shown for specific color codes in place of the default palette
    pub overrides: ColorOverrides,
    /// Whether the built-in palette backs codes that have no override
    pub use_default_palette: bool,
    /// Metric used for nearest-color matching
    pub metric: ColorDistance,
    /// Values used where no style run applies
    pub default_style: DefaultStyle,
    /// Minimum font weight, on a 0 to 15 scale, treated as bold
    pub bold_weight_threshold: u8,
}

impl StyleConfig {
    /// Built-in palette, no overrides, Euclidean matching.
    pub fn standard() -> StyleConfig {
        StyleConfig {
            overrides: ColorOverrides::new(),
            use_default_palette: true,
            metric: ColorDistance::Euclidean,
            default_style: DefaultStyle::default(),
            bold_weight_threshold: BOLD_FONT_MIN_WEIGHT,
        }
    }

    /// Built-in palette shadowed by the given overrides.
    pub fn with_overrides(overrides: ColorOverrides) -> StyleConfig {
        StyleConfig {
            overrides,
            ..StyleConfig::standard()
        }
    }

    /// Only the given overrides are available; the built-in palette is off.
    pub fn overrides_only(overrides: ColorOverrides) -> StyleConfig {
        StyleConfig {
            overrides,
            use_default_palette: false,
            ..StyleConfig::standard()
        }
    }

    /// Returns `true` if a font of this weight should be rendered bold.
    pub fn is_bold_weight(&self, weight: u8) -> bool {
        weight >= self.bold_weight_threshold
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fallback values for offsets not covered by a style run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultStyle {
    /// Text color outside foreground runs. When set, the encoder does not
    /// emit foreground runs of exactly this color.
    pub foreground: Option<Rgb>,
    /// Fill color outside background runs
    pub background: Option<Rgb>,
}

impl DefaultStyle {
    pub fn new(foreground: Option<Rgb>, background: Option<Rgb>) -> DefaultStyle {
        DefaultStyle {
            foreground,
            background,
        }
    }
}
