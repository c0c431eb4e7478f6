use cidian_types::RouteParams;
use unicode_normalization::UnicodeNormalization;

/// Trim and NFC-normalize a route value
pub fn normalize(value: &str) -> String {
    value.trim().nfc().collect()
}

pub fn normalize_route(route: RouteParams) -> RouteParams {
    RouteParams {
        dictionary_type: normalize(&route.dictionary_type),
        index: normalize(&route.index),
        pinyin: normalize(&route.pinyin),
        word_head: normalize(&route.word_head),
    }
}
