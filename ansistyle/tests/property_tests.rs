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

//! Property tests for the escape codec

use ansistyle::{
    AnsiColor, Attribute, ColorMapper, ColorOverrides, ColorRole, Occurrence, RedMean, Rgb,
    SgrCode, StyleConfig, StyleRun, build_runs, default_color, encode_occurrences, encode_runs,
    ends_formatting, merge_runs, tokenize,
};
use proptest::prelude::*;
use proptest::sample::select;

fn any_code() -> impl Strategy<Value = SgrCode> {
    select((0..=u8::MAX).filter_map(SgrCode::from_u8).collect::<Vec<_>>())
}

fn any_rgb() -> impl Strategy<Value = Rgb> {
    any::<(u8, u8, u8)>().prop_map(|(red, green, blue)| Rgb::new(red, green, blue))
}

fn palette_rgb() -> impl Strategy<Value = Rgb> {
    select(AnsiColor::ALL.to_vec()).prop_map(default_color)
}

fn any_role() -> impl Strategy<Value = ColorRole> {
    select(ColorRole::ALL.to_vec())
}

/// Per-character attribute choices for each category.
fn columns(len: usize) -> impl Strategy<Value = Vec<Vec<Option<Attribute>>>> {
    let foreground = prop::option::of(palette_rgb().prop_map(Attribute::Foreground));
    let background = prop::option::of(palette_rgb().prop_map(Attribute::Background));
    let intensity = prop::option::of(select(vec![Attribute::Bold, Attribute::Faint]));
    let italic = prop::option::of(Just(Attribute::Italic));
    let underline = prop::option::of(select(vec![
        Attribute::UnderlineSingle,
        Attribute::UnderlineDouble,
    ]));
    (
        prop::collection::vec(foreground, len),
        prop::collection::vec(background, len),
        prop::collection::vec(intensity, len),
        prop::collection::vec(italic, len),
        prop::collection::vec(underline, len),
    )
        .prop_map(|(a, b, c, d, e)| vec![a, b, c, d, e])
}

fn runs_from_columns(columns: &[Vec<Option<Attribute>>]) -> Vec<StyleRun> {
    let mut runs = Vec::new();
    for column in columns {
        let mut start = 0;
        while start < column.len() {
            let mut end = start + 1;
            while end < column.len() && column[end] == column[start] {
                end += 1;
            }
            if let Some(attribute) = column[start] {
                runs.push(StyleRun::new(start..end, attribute));
            }
            start = end;
        }
    }
    runs
}

fn styled_input() -> impl Strategy<Value = (String, Vec<StyleRun>)> {
    (0..32usize).prop_flat_map(|len| {
        (
            prop::collection::vec(select(vec!['a', 'b', ' ', 'é', '中']), len)
                .prop_map(|chars| chars.into_iter().collect::<String>()),
            columns(len).prop_map(|columns| runs_from_columns(&columns)),
        )
    })
}

fn escaped_input() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        "[a-z ;\\[m0-9]{0,8}",
        "\x1b\\[[0-9;]{0,6}m",
        "\x1b\\[[0-9;]{0,4}",
        Just("\x1b".to_string()),
    ];
    prop::collection::vec(segment, 0..10).prop_map(|segments| segments.concat())
}

proptest! {
    #[test]
    fn prop_encode_then_parse_recovers_runs((text, runs) in styled_input()) {
        let config = StyleConfig::standard();
        let escaped = encode_runs(&text, &runs, &config).unwrap();
        let tokens = tokenize(&escaped);
        prop_assert_eq!(&tokens.clean, &text);

        let parsed = build_runs(tokens.clean_len(), &tokens.occurrences, &ColorMapper::new(&config)).unwrap();
        prop_assert_eq!(merge_runs(&parsed), merge_runs(&runs));
    }

    #[test]
    fn prop_cleaning_is_idempotent(input in escaped_input()) {
        let once = tokenize(&input).clean;
        let twice = tokenize(&once);
        prop_assert_eq!(&twice.clean, &once);
    }

    #[test]
    fn prop_occurrences_survive_reinsertion(
        clean in "[a-z ]{0,16}",
        codes in prop::collection::vec((any_code(), any::<prop::sample::Index>()), 0..8)
    ) {
        let len = clean.chars().count();
        let mut occurrences: Vec<Occurrence> = codes
            .into_iter()
            .map(|(code, index)| Occurrence::new(code, index.index(len + 1)))
            .collect();
        occurrences.sort_by_key(|occurrence| occurrence.location);

        let escaped = encode_occurrences(&clean, &occurrences).unwrap();
        let tokens = tokenize(&escaped);
        prop_assert_eq!(tokens.clean, clean);
        prop_assert_eq!(tokens.occurrences, occurrences);
    }

    #[test]
    fn prop_reset_ends_everything(start in any_code()) {
        prop_assert!(ends_formatting(SgrCode::Reset, start));
    }

    #[test]
    fn prop_same_role_colors_replace(
        a in select(AnsiColor::ALL.to_vec()),
        b in select(AnsiColor::ALL.to_vec()),
        role in any_role()
    ) {
        prop_assert!(ends_formatting(SgrCode::color(role, b), SgrCode::color(role, a)));
        prop_assert!(!ends_formatting(SgrCode::Underline(ansistyle::Underline::Single), SgrCode::color(role, a)));
    }

    #[test]
    fn prop_closest_match_is_in_palette(
        color in any_rgb(),
        role in any_role(),
        overrides in prop::collection::vec((any_role(), select(AnsiColor::ALL.to_vec()), any_rgb()), 0..6),
        defaults in any::<bool>()
    ) {
        let overrides: ColorOverrides = overrides.into_iter().collect();
        let mut config = StyleConfig::with_overrides(overrides);
        config.use_default_palette = defaults;
        let mapper = ColorMapper::new(&config);

        let candidates: Vec<SgrCode> = mapper.palette(role).map(|(code, _)| code).collect();
        match mapper.closest_code_for_color(color, role) {
            Ok(code) => {
                prop_assert!(candidates.contains(&code));
                let by_red_mean = mapper.closest_code_for_color_with(color, role, &RedMean).unwrap();
                prop_assert!(candidates.contains(&by_red_mean));
            }
            Err(_) => prop_assert!(candidates.is_empty()),
        }
        if defaults {
            prop_assert!(!candidates.is_empty());
        }
    }

    #[test]
    fn prop_exact_match_resolves_to_same_color(color in palette_rgb(), role in any_role()) {
        let config = StyleConfig::standard();
        let mapper = ColorMapper::new(&config);
        let code = mapper.code_for_color(color, role).unwrap();
        prop_assert_eq!(mapper.color_for_code(code), Some(color));
        prop_assert_eq!(mapper.closest_code_for_color(color, role).unwrap(), code);
    }
}
