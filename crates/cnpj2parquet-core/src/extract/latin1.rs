// Latin-1 (ISO-8859-1) field decoding
//
// Every byte maps to the code point of the same value, so decoding cannot fail.

use std::borrow::Cow;

pub(crate) fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    if bytes.is_ascii() {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Cow::Borrowed(text);
        }
    }
    Cow::Owned(bytes.iter().copied().map(char::from).collect())
}
