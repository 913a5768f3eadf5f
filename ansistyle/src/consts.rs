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

/// Control Sequence Introducer: `ESC` followed by `[`.
pub const CSI: &str = "\x1b[";

/// The escape control character that opens every sequence.
pub const ESCAPE: char = '\x1b';

/// The byte following `ESC` in a control sequence.
pub const INTRODUCER: char = '[';

/// Separator between numeric parameters of an SGR sequence.
pub const PARAMETER_DELIMITER: char = ';';

/// Final byte of a Select Graphic Rendition sequence.
pub const SGR_TERMINATOR: char = 'm';

/// Minimum font weight, on a 0 to 15 scale, considered bold.
pub const BOLD_FONT_MIN_WEIGHT: u8 = 9;
