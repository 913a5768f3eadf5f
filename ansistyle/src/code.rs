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

//! The table of recognised Select Graphic Rendition codes.
//!
//! Every recognised code belongs to exactly one [`Category`]. The numeric wire
//! value is kept apart from the code itself: [`SgrCode::to_u8`] and
//! [`SgrCode::from_u8`] convert between the two.
//!
//! | Code      | Meaning                    |
//! |-----------|----------------------------|
//! | `0`       | Reset all attributes       |
//! | `1`       | Bold                       |
//! | `2`       | Faint                      |
//! | `22`      | Normal intensity           |
//! | `3`       | Italic                     |
//! | `4`       | Single underline           |
//! | `21`      | Double underline           |
//! | `24`      | No underline               |
//! | `30`-`37` | Foreground color           |
//! | `39`      | Default foreground         |
//! | `40`-`47` | Background color           |
//! | `49`      | Default background         |
//! | `90`-`97` | Bright foreground color    |
//! | `100`-`107` | Bright background color  |

use std::cmp::Ordering;

/// A recognised SGR formatting code.
///
/// Codes are ordered by their numeric wire value, which is the order used
/// for every tie-break in color matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SgrCode {
    /// Ends every open formatting run (`0`).
    Reset,
    /// Bold, faint, or normal intensity (`1`, `2`, `22`).
    Intensity(Intensity),
    /// Italic on (`3`). There is no italic-off code in this table.
    Italic,
    /// Single, double, or no underline (`4`, `21`, `24`).
    Underline(Underline),
    /// A palette foreground color (`30`-`37`, `90`-`97`).
    Foreground(AnsiColor),
    /// Default foreground (`39`).
    ForegroundReset,
    /// A palette background color (`40`-`47`, `100`-`107`).
    Background(AnsiColor),
    /// Default background (`49`).
    BackgroundReset,
}

impl SgrCode {
    /// Build the color code for a role.
    pub fn color(role: ColorRole, color: AnsiColor) -> SgrCode {
        match role {
            ColorRole::Foreground => SgrCode::Foreground(color),
            ColorRole::Background => SgrCode::Background(color),
        }
    }

    /// The code restoring the default color for a role.
    pub fn color_reset(role: ColorRole) -> SgrCode {
        match role {
            ColorRole::Foreground => SgrCode::ForegroundReset,
            ColorRole::Background => SgrCode::BackgroundReset,
        }
    }

    /// The category this code belongs to.
    pub fn category(&self) -> Category {
        match self {
            SgrCode::Reset => Category::Reset,
            SgrCode::Intensity(_) => Category::Intensity,
            SgrCode::Italic => Category::Italic,
            SgrCode::Underline(_) => Category::Underline,
            SgrCode::Foreground(_) | SgrCode::ForegroundReset => Category::Foreground,
            SgrCode::Background(_) | SgrCode::BackgroundReset => Category::Background,
        }
    }

    /// The color role of a color or color reset code.
    pub fn role(&self) -> Option<ColorRole> {
        match self.category() {
            Category::Foreground => Some(ColorRole::Foreground),
            Category::Background => Some(ColorRole::Background),
            _ => None,
        }
    }

    /// The palette color selected by this code, if it selects one.
    pub fn ansi_color(&self) -> Option<AnsiColor> {
        match self {
            SgrCode::Foreground(color) | SgrCode::Background(color) => Some(*color),
            _ => None,
        }
    }

    /// Returns `true` if this code only ends formatting and never starts any.
    pub fn is_reset(&self) -> bool {
        matches!(
            self,
            SgrCode::Reset
                | SgrCode::Intensity(Intensity::Normal)
                | SgrCode::Underline(Underline::Disabled)
                | SgrCode::ForegroundReset
                | SgrCode::BackgroundReset
        )
    }

    /// Numeric wire value of this code.
    pub fn to_u8(&self) -> u8 {
        match self {
            SgrCode::Reset => 0,
            SgrCode::Intensity(intensity) => intensity.to_u8(),
            SgrCode::Italic => 3,
            SgrCode::Underline(underline) => underline.to_u8(),
            SgrCode::Foreground(color) if color.is_bright() => 90 + color.offset(),
            SgrCode::Foreground(color) => 30 + color.offset(),
            SgrCode::ForegroundReset => 39,
            SgrCode::Background(color) if color.is_bright() => 100 + color.offset(),
            SgrCode::Background(color) => 40 + color.offset(),
            SgrCode::BackgroundReset => 49,
        }
    }

    /// Decode a numeric wire value. Returns `None` for unrecognised values.
    pub fn from_u8(value: u8) -> Option<SgrCode> {
        match value {
            0 => Some(SgrCode::Reset),
            1 | 2 | 22 => Intensity::from_u8(value).map(SgrCode::Intensity),
            3 => Some(SgrCode::Italic),
            4 | 21 | 24 => Underline::from_u8(value).map(SgrCode::Underline),
            30..=37 => AnsiColor::from_index(value - 30).map(SgrCode::Foreground),
            39 => Some(SgrCode::ForegroundReset),
            40..=47 => AnsiColor::from_index(value - 40).map(SgrCode::Background),
            49 => Some(SgrCode::BackgroundReset),
            90..=97 => AnsiColor::from_index(value - 90 + 8).map(SgrCode::Foreground),
            100..=107 => AnsiColor::from_index(value - 100 + 8).map(SgrCode::Background),
            _ => None,
        }
    }
}

impl Ord for SgrCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u8().cmp(&other.to_u8())
    }
}

impl PartialOrd for SgrCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for SgrCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

/// The category of an [`SgrCode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// `0`
    Reset,
    /// `1`, `2`, `22`
    Intensity,
    /// `3`
    Italic,
    /// `4`, `21`, `24`
    Underline,
    /// `30`-`37`, `39`, `90`-`97`
    Foreground,
    /// `40`-`47`, `49`, `100`-`107`
    Background,
}

impl Category {
    /// The narrowest code that clears this category without touching the
    /// others. Italic has none; only a full reset ends it.
    pub fn reset_code(&self) -> Option<SgrCode> {
        match self {
            Category::Reset => Some(SgrCode::Reset),
            Category::Intensity => Some(SgrCode::Intensity(Intensity::Normal)),
            Category::Italic => None,
            Category::Underline => Some(SgrCode::Underline(Underline::Disabled)),
            Category::Foreground => Some(SgrCode::ForegroundReset),
            Category::Background => Some(SgrCode::BackgroundReset),
        }
    }
}

/// Whether a color applies to the text or behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRole {
    /// Text color
    Foreground,
    /// Fill color behind the text
    Background,
}

impl ColorRole {
    /// Both roles, foreground first.
    pub const ALL: [ColorRole; 2] = [ColorRole::Foreground, ColorRole::Background];
}

impl std::fmt::Display for ColorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorRole::Foreground => f.write_str("foreground"),
            ColorRole::Background => f.write_str("background"),
        }
    }
}

/// Represents the intensity (weight) of text.
///
/// `Bold` and `Faint` are mutually exclusive; setting one ends the other.
/// `Normal` ends both.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum Intensity {
    /// Normal intensity (`22`)
    #[default]
    Normal,
    /// Increased intensity (`1`)
    Bold,
    /// Decreased intensity (`2`)
    Faint,
}

impl Intensity {
    pub fn to_u8(&self) -> u8 {
        match self {
            Intensity::Bold => 1,
            Intensity::Faint => 2,
            Intensity::Normal => 22,
        }
    }

    pub fn from_u8(value: u8) -> Option<Intensity> {
        match value {
            1 => Some(Intensity::Bold),
            2 => Some(Intensity::Faint),
            22 => Some(Intensity::Normal),
            _ => None,
        }
    }
}

/// Underline style.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum Underline {
    /// No underline (`24`)
    #[default]
    Disabled,
    /// Single underline (`4`)
    Single,
    /// Double underline (`21`)
    Double,
}

impl Underline {
    pub fn to_u8(&self) -> u8 {
        match self {
            Underline::Single => 4,
            Underline::Double => 21,
            Underline::Disabled => 24,
        }
    }

    pub fn from_u8(value: u8) -> Option<Underline> {
        match value {
            4 => Some(Underline::Single),
            21 => Some(Underline::Double),
            24 => Some(Underline::Disabled),
            _ => None,
        }
    }
}

/// One of the sixteen palette colors addressable by basic SGR codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl AnsiColor {
    /// All palette colors in index order.
    pub const ALL: [AnsiColor; 16] = [
        AnsiColor::Black,
        AnsiColor::Red,
        AnsiColor::Green,
        AnsiColor::Yellow,
        AnsiColor::Blue,
        AnsiColor::Magenta,
        AnsiColor::Cyan,
        AnsiColor::White,
        AnsiColor::BrightBlack,
        AnsiColor::BrightRed,
        AnsiColor::BrightGreen,
        AnsiColor::BrightYellow,
        AnsiColor::BrightBlue,
        AnsiColor::BrightMagenta,
        AnsiColor::BrightCyan,
        AnsiColor::BrightWhite,
    ];

    /// Palette index, `0` to `15`.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_index(index: u8) -> Option<AnsiColor> {
        AnsiColor::ALL.get(index as usize).copied()
    }

    pub fn is_bright(&self) -> bool {
        self.index() >= 8
    }

    // Position within the standard or bright group of eight.
    fn offset(&self) -> u8 {
        self.index() % 8
    }
}
