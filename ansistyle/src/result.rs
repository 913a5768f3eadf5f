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

//! Error types for the ansistyle crate.
//!
//! Decoding escaped text is tolerant and never fails; the errors here cover
//! style runs that do not fit their string, color lookups against a palette
//! with no candidates, and writer failures.

use crate::code::{ColorRole, SgrCode};
use crate::runs::AttributeKind;
use std::ops::Range;

/// Result type alias for operations that may fail with a [`StyleError`].
pub type StyleResult<T> = Result<T, StyleError>;

/// Errors that can occur when converting between escaped and styled text.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// No palette entry exists for the requested role.
    ///
    /// Only reachable when the default palette has been disabled and the
    /// override table holds no color for this role.
    #[error("No {role} colors available for matching")]
    EmptyPalette {
        /// The role that had no candidates
        role: ColorRole,
    },

    /// Range is out of bounds for the string.
    #[error("Range out of bounds: {range:?} (maximum valid position: {max})")]
    RangeOutOfBounds {
        /// The range that was requested
        range: Range<usize>,
        /// The maximum valid position
        max: usize,
    },

    /// A range whose start lies after its end.
    #[error("Invalid range: {range:?}")]
    InvalidRange {
        /// The offending range
        range: Range<usize>,
    },

    /// Two runs of the same attribute kind cover a common offset.
    #[error("Overlapping {kind:?} runs: {first:?} and {second:?}")]
    OverlappingRuns {
        /// The attribute kind both runs share
        kind: AttributeKind,
        /// The earlier run's range
        first: Range<usize>,
        /// The later run's range
        second: Range<usize>,
    },

    /// A code that does not select a color was used where one is required.
    #[error("SGR code {0} is not a color code")]
    NotAColorCode(SgrCode),

    /// Writing formatted output failed.
    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}
