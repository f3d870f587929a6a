use encoding_rs::{DecoderResult, MACINTOSH, UTF_16BE};
use rustybuzz::{
    Face,
    ttf_parser::{
        PlatformId, fonts_in_collection,
        name::{Name, Names},
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreferredLanguage {
    Japanese,
    UnitedStates,
}

impl PreferredLanguage {
    fn windows_lang_id(&self) -> u16 {
        match self {
            PreferredLanguage::Japanese => 1041,
            PreferredLanguage::UnitedStates => 1033,
        }
    }
}

/// OpenType `name` table identifiers used when describing a loaded font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NameId {
    FontFamilyName,
    FontSubfamilyName,
    FullFontName,
    PostscriptName,
}

impl From<NameId> for u16 {
    fn from(value: NameId) -> Self {
        match value {
            NameId::FontFamilyName => 1,
            NameId::FontSubfamilyName => 2,
            NameId::FullFontName => 4,
            NameId::PostscriptName => 6,
        }
    }
}

/// Full font names of every face in `data` (one entry per face of a collection).
pub fn font_name(data: &[u8], preferred_language: Option<PreferredLanguage>) -> Vec<String> {
    let face_count = fonts_in_collection(data).unwrap_or(1);
    (0..face_count)
        .filter_map(|index| Face::from_slice(data, index))
        .filter_map(|face| get_font_name(&face.names(), NameId::FullFontName, preferred_language))
        .collect()
}

pub fn get_font_name(
    names: &Names,
    name_id: NameId,
    preferred_language: Option<PreferredLanguage>,
) -> Option<String> {
    let name_id: u16 = name_id.into();
    let (_, encoding, record) = names
        .into_iter()
        .filter(|name| name.name_id == name_id)
        .filter_map(|name| {
            score_encoding(&name, preferred_language).map(|(score, encoding)| (score, encoding, name))
        })
        .max_by_key(|(score, _, _)| *score)?;
    decode_name(encoding, record.name)
}

#[derive(Debug, Clone, Copy)]
enum NameEncoding {
    Utf16Be,
    AppleRoman,
}

fn score_encoding(
    name: &Name,
    preferred_language: Option<PreferredLanguage>,
) -> Option<(usize, NameEncoding)> {
    let preferred =
        |language_id: u16| preferred_language.is_some_and(|l| l.windows_lang_id() == language_id);
    match (name.platform_id, name.encoding_id, name.language_id) {
        // Windows; Unicode full repertoire
        (PlatformId::Windows, 10, _) => Some((1000, NameEncoding::Utf16Be)),
        (PlatformId::Unicode, 6, 0) => Some((900, NameEncoding::Utf16Be)),
        (PlatformId::Unicode, 4, 0) => Some((800, NameEncoding::Utf16Be)),

        // Windows; Unicode BMP
        (PlatformId::Windows, 1, lang) if preferred(lang) => Some((1000, NameEncoding::Utf16Be)),
        (PlatformId::Windows, 1, 0x409) => Some((750, NameEncoding::Utf16Be)),
        (PlatformId::Windows, 1, _) => Some((700, NameEncoding::Utf16Be)),

        (PlatformId::Unicode, 3, 0) => Some((600, NameEncoding::Utf16Be)),
        (PlatformId::Unicode, 2, 0) => Some((500, NameEncoding::Utf16Be)),
        (PlatformId::Unicode, 1, 0) => Some((400, NameEncoding::Utf16Be)),
        (PlatformId::Unicode, 0, 0) => Some((300, NameEncoding::Utf16Be)),

        // Windows, Symbol
        (PlatformId::Windows, 0, _) => Some((200, NameEncoding::Utf16Be)),

        // Apple Roman
        (PlatformId::Macintosh, 0, 0) => Some((150, NameEncoding::AppleRoman)),
        (PlatformId::Macintosh, 0, _) => Some((100, NameEncoding::AppleRoman)),
        _ => None,
    }
}

fn decode_name(encoding: NameEncoding, data: &[u8]) -> Option<String> {
    let mut decoder = match encoding {
        NameEncoding::Utf16Be => UTF_16BE.new_decoder(),
        NameEncoding::AppleRoman => MACINTOSH.new_decoder(),
    };
    let capacity = decoder.max_utf8_buffer_length(data.len())?;
    let mut decoded = String::with_capacity(capacity);
    match decoder.decode_to_string_without_replacement(data, &mut decoded, true) {
        (DecoderResult::InputEmpty, _) => Some(decoded),
        _ => None,
    }
}
