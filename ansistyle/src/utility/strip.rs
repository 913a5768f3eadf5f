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

use crate::tokenizer::tokenize;
use std::borrow::Cow;

/// Removes SGR escape sequences from a string.
///
/// Only complete `ESC [ <params> m` sequences are removed; anything else,
/// including unterminated sequences and other control sequences, is kept.
///
/// # Performance
///
/// If the input contains no escape character, a borrowed reference to the
/// original string is returned without copying.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// # use ansistyle::strip_sgr_codes;
///
/// assert_eq!(strip_sgr_codes("\x1b[1;31mRed Text\x1b[0m"), "Red Text");
/// assert!(matches!(strip_sgr_codes("Plain Text"), Cow::Borrowed(_)));
/// ```
pub fn strip_sgr_codes(str: &str) -> Cow<'_, str> {
    if !str.contains('\x1b') {
        return Cow::Borrowed(str);
    }
    Cow::Owned(tokenize(str).clean)
}
