//! Translation direction detection.
//!
//! The translator works on a single language pair (Chinese and English) and
//! infers the direction from the input itself: text containing Chinese is
//! translated to English, anything else is translated to Chinese. Playback
//! always speaks the English side of the pair, whichever side that is.

use whatlang::Script;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a translation runs for the zh-CN / en language pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Chinese input, English output.
    ZhToEn,
    /// English (or any non-Chinese) input, Chinese output.
    EnToZh,
}

impl Direction {
    /// Infer the direction from the input text.
    ///
    /// Uses `whatlang` script detection first; short or mixed inputs that the
    /// detector cannot classify fall back to a CJK code-point scan.
    pub fn of(text: &str) -> Self {
        let is_chinese = match whatlang::detect_script(text) {
            Some(Script::Mandarin) => true,
            Some(_) => contains_cjk(text),
            None => contains_cjk(text),
        };

        if is_chinese {
            Direction::ZhToEn
        } else {
            Direction::EnToZh
        }
    }

    /// Source language code sent to the translation backend.
    pub fn source(&self) -> &'static str {
        match self {
            Direction::ZhToEn => "zh-CN",
            Direction::EnToZh => "en",
        }
    }

    /// Target language code sent to the translation backend.
    pub fn target(&self) -> &'static str {
        match self {
            Direction::ZhToEn => "en",
            Direction::EnToZh => "zh-CN",
        }
    }
}

/// Returns `true` when `text` contains at least one CJK unified ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

/// Pick the side of a finished translation that playback should speak.
///
/// The spoken text is always the English side: for Chinese input that is the
/// translation, for English input it is the original.
pub fn spoken_side<'a>(direction: Direction, original: &'a str, translated: &'a str) -> &'a str {
    match direction {
        Direction::ZhToEn => translated,
        Direction::EnToZh => original,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
