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

mod code;
mod color;
mod config;
mod consts;
mod encoder;
mod result;
mod runs;
mod styler;
mod tokenizer;
pub mod utility;

pub use self::code::{AnsiColor, Category, ColorRole, Intensity, SgrCode, Underline};
pub use self::color::{
    ColorDistance, ColorMapper, ColorMetric, ColorOverrides, Euclidean, RedMean, Rgb,
    default_color,
};
pub use self::config::{DefaultStyle, StyleConfig};
pub use self::encoder::{
    code_for_attribute, encode_occurrences, encode_runs, encode_runs_into, write_runs,
    write_sequence,
};
pub use self::result::{StyleError, StyleResult};
pub use self::runs::{Attribute, AttributeKind, StyleRun, build_runs, ends_formatting, merge_runs};
pub use self::styler::AnsiStyler;
pub use self::tokenizer::{Occurrence, Tokenized, tokenize};
pub use self::utility::{ResolvedStyle, StyledText, strip_sgr_codes};
