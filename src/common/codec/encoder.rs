pub use encode::*;

// Classifier & capacity planner
//------------------------------------------------------------------------------

pub mod encode {
    use std::borrow::Cow;

    use encoding_rs::{Encoding, SHIFT_JIS};

    use crate::common::codec::{Content, Mode, MODE_INDICATOR_BITS};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};
    use crate::common::BitStream;

    use super::writer::{pad_remaining_capacity, push_header, push_payload, push_terminator};

    const DEFAULT_ENCODING: &str = "iso-8859-1";

    /// Guesses the narrowest mode the content fits in. Rules are tried in
    /// order and the first match wins; a failed reinterpretation under a
    /// narrower rule falls through, it never surfaces as an error.
    pub fn classify(content: Content) -> Mode {
        match content {
            Content::Text(t) => classify_text(t),
            Content::Bytes(b) => classify_bytes(b),
        }
    }

    fn classify_text(text: &str) -> Mode {
        let bytes = text.as_bytes();
        if bytes.iter().all(|&b| Mode::Numeric.contains(b)) {
            return Mode::Numeric;
        }
        if bytes.iter().all(|&b| Mode::Alphanumeric.contains(b)) {
            return Mode::Alphanumeric;
        }
        let (sjis, _, had_errors) = SHIFT_JIS.encode(text);
        if !had_errors && is_kanji_pairs(&sjis) {
            return Mode::Kanji;
        }
        Mode::Byte
    }

    fn classify_bytes(bytes: &[u8]) -> Mode {
        if bytes.iter().all(|&b| Mode::Numeric.contains(b)) {
            return Mode::Numeric;
        }
        if bytes.iter().all(|&b| Mode::Alphanumeric.contains(b)) {
            return Mode::Alphanumeric;
        }
        if is_kanji_pairs(bytes) {
            return Mode::Kanji;
        }
        Mode::Byte
    }

    // Every big-endian pair must land in one of the two Shift JIS
    // double-byte kanji ranges; an odd byte length disqualifies outright
    fn is_kanji_pairs(bytes: &[u8]) -> bool {
        if bytes.len() & 1 == 1 {
            return false;
        }
        bytes.chunks_exact(2).all(|c| {
            let pair = ((c[0] as u16) << 8) | c[1] as u16;
            matches!(pair, 0x8140..=0x9FFC | 0xE040..=0xEBBF)
        })
    }

    // Byte is the widest mode and always acceptable; Numeric and Kanji
    // must match the guess exactly; Alphanumeric may widen Numeric
    fn validate_mode(requested: Mode, detected: Mode) -> QRResult<()> {
        let compatible = match requested {
            Mode::Byte => true,
            Mode::Numeric => detected == Mode::Numeric,
            Mode::Kanji => detected == Mode::Kanji,
            Mode::Alphanumeric => matches!(detected, Mode::Numeric | Mode::Alphanumeric),
        };
        if compatible {
            Ok(())
        } else {
            Err(QRError::IncompatibleMode { requested, detected })
        }
    }

    fn resolve_encoding(label: &str) -> QRResult<&'static Encoding> {
        Encoding::for_label(label.as_bytes()).ok_or_else(|| QRError::InvalidEncoding(label.into()))
    }

    /// Settles mode and payload bytes in one step. Text is transcoded
    /// here and nowhere else: Kanji forces Shift JIS, Byte uses the
    /// caller's encoding label (ISO 8859-1 when absent).
    pub fn resolve<'a>(
        content: Content<'a>,
        requested: Option<Mode>,
        encoding: Option<&str>,
    ) -> QRResult<(Mode, Cow<'a, [u8]>)> {
        let detected = classify(content);
        let mode = match requested {
            Some(m) => {
                validate_mode(m, detected)?;
                m
            }
            None => detected,
        };

        let payload = match content {
            Content::Bytes(b) => Cow::Borrowed(b),
            Content::Text(t) => match mode {
                Mode::Numeric => Cow::Borrowed(t.as_bytes()),
                Mode::Alphanumeric => Cow::Owned(t.to_ascii_uppercase().into_bytes()),
                Mode::Kanji => {
                    let (sjis, _, had_errors) = SHIFT_JIS.encode(t);
                    if had_errors {
                        return Err(QRError::UnencodableContent);
                    }
                    Cow::Owned(sjis.into_owned())
                }
                Mode::Byte => {
                    // Kanji-classified content keeps its Japanese encoding
                    // even when widened to Byte mode
                    let enc = if detected == Mode::Kanji {
                        SHIFT_JIS
                    } else {
                        resolve_encoding(encoding.unwrap_or(DEFAULT_ENCODING))?
                    };
                    let (bytes, _, had_errors) = enc.encode(t);
                    if had_errors {
                        return Err(QRError::UnencodableContent);
                    }
                    Cow::Owned(bytes.into_owned())
                }
            },
        };

        Ok((mode, payload))
    }

    fn encoded_bit_len(payload: &[u8], mode: Mode, ver: Version) -> usize {
        MODE_INDICATOR_BITS + ver.char_cnt_bits(mode) + mode.encoded_len(payload.len())
    }

    /// Scans versions in increasing order and returns the first one whose
    /// data capacity holds the encoded stream.
    pub fn fit_version(payload: &[u8], mode: Mode, ecl: ECLevel) -> QRResult<Version> {
        (1..=40)
            .map(Version)
            .find(|v| encoded_bit_len(payload, mode, *v) <= v.data_bit_capacity(ecl))
            .ok_or(QRError::DataTooLong)
    }

    /// Assembles the full data bit stream: mode indicator, character
    /// count, payload, terminator, and padding up to exact capacity.
    pub fn assemble(
        payload: &[u8],
        mode: Mode,
        ver: Version,
        ecl: ECLevel,
    ) -> QRResult<BitStream> {
        let bit_capacity = ver.data_bit_capacity(ecl);
        if encoded_bit_len(payload, mode, ver) > bit_capacity {
            return Err(QRError::DataTooLong);
        }

        let mut bs = BitStream::new(bit_capacity);
        push_header(mode, mode.char_count(payload.len()), ver.char_cnt_bits(mode), &mut bs);
        push_payload(payload, mode, &mut bs);
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);

        debug_assert!(
            bs.len() == bit_capacity,
            "Padded stream must fill capacity exactly: Len {}, Capacity {bit_capacity}",
            bs.len()
        );

        Ok(bs)
    }

    #[cfg(test)]
    mod classify_tests {
        use test_case::test_case;

        use super::{classify, resolve, Content, Mode, QRError};

        #[test_case("0123456789", Mode::Numeric)]
        #[test_case("42", Mode::Numeric)]
        #[test_case("HELLO WORLD", Mode::Alphanumeric)]
        #[test_case("AC-42", Mode::Alphanumeric)]
        #[test_case("$%*+-./:", Mode::Alphanumeric)]
        #[test_case("hello world", Mode::Byte; "lowercase is byte, the charset is case sensitive")]
        #[test_case("HELLO, WORLD", Mode::Byte; "comma is outside the charset")]
        #[test_case("日本語", Mode::Kanji)]
        #[test_case("こんにちは", Mode::Kanji; "full width hiragana pairs fall in the first range")]
        #[test_case("日本語abc", Mode::Byte; "mixed width shift jis is not kanji")]
        #[test_case("ｱ", Mode::Byte; "single byte katakana is not kanji")]
        fn test_classify_text(text: &str, exp: Mode) {
            assert_eq!(classify(Content::Text(text)), exp);
        }

        #[test_case(b"8675309", Mode::Numeric)]
        #[test_case(b"QR CODE", Mode::Alphanumeric)]
        #[test_case(&[0x93, 0x5F, 0xE4, 0xAA], Mode::Kanji)]
        #[test_case(&[0x93, 0x5F, 0xE4], Mode::Byte; "odd length cannot be kanji")]
        #[test_case(&[0x00, 0x01, 0x02], Mode::Byte)]
        #[test_case(&[0x7F, 0x40], Mode::Byte; "pair below the first kanji range")]
        fn test_classify_bytes(bytes: &[u8], exp: Mode) {
            assert_eq!(classify(Content::Bytes(bytes)), exp);
        }

        #[test]
        fn test_forced_mode_validation() {
            let digits = Content::Text("12345");
            let letters = Content::Text("HELLO");
            let binary = Content::Text("hello");

            // Widening is fine
            assert_eq!(resolve(digits, Some(Mode::Alphanumeric), None).unwrap().0, Mode::Alphanumeric);
            assert_eq!(resolve(digits, Some(Mode::Byte), None).unwrap().0, Mode::Byte);
            assert_eq!(resolve(letters, Some(Mode::Byte), None).unwrap().0, Mode::Byte);

            // Narrowing is not
            assert_eq!(
                resolve(letters, Some(Mode::Numeric), None),
                Err(QRError::IncompatibleMode {
                    requested: Mode::Numeric,
                    detected: Mode::Alphanumeric
                })
            );
            assert_eq!(
                resolve(binary, Some(Mode::Alphanumeric), None),
                Err(QRError::IncompatibleMode {
                    requested: Mode::Alphanumeric,
                    detected: Mode::Byte
                })
            );
            assert_eq!(
                resolve(binary, Some(Mode::Kanji), None),
                Err(QRError::IncompatibleMode { requested: Mode::Kanji, detected: Mode::Byte })
            );
        }

        #[test]
        fn test_resolve_kanji_payload() {
            let (mode, payload) = resolve(Content::Text("日本"), None, None).unwrap();
            assert_eq!(mode, Mode::Kanji);
            assert_eq!(&*payload, &[0x93, 0xFA, 0x96, 0x7B]);
        }

        #[test]
        fn test_resolve_byte_payload_latin1() {
            let (mode, payload) = resolve(Content::Text("café"), None, None).unwrap();
            assert_eq!(mode, Mode::Byte);
            assert_eq!(&*payload, b"caf\xE9");
        }

        #[test]
        fn test_resolve_byte_payload_utf8() {
            let (mode, payload) = resolve(Content::Text("café"), None, Some("utf-8")).unwrap();
            assert_eq!(mode, Mode::Byte);
            assert_eq!(&*payload, "café".as_bytes());
        }

        #[test]
        fn test_resolve_unknown_encoding() {
            let res = resolve(Content::Text("hello"), None, Some("no-such-charset"));
            assert_eq!(res, Err(QRError::InvalidEncoding("no-such-charset".into())));
        }
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::codec::{Mode, MODE_INDICATOR_BITS, PADDING_CODEWORDS};
    use crate::common::BitStream;

    pub fn push_header(mode: Mode, char_count: usize, count_bits: usize, out: &mut BitStream) {
        out.push_bits(mode as u16, MODE_INDICATOR_BITS);
        debug_assert!(
            char_count < (1 << count_bits),
            "Char count exceeds count field: Char count {char_count}, Field bits {count_bits}"
        );
        out.push_bits(char_count as u16, count_bits);
    }

    pub fn push_payload(payload: &[u8], mode: Mode, out: &mut BitStream) {
        match mode {
            Mode::Numeric => push_numeric_data(payload, out),
            Mode::Alphanumeric => push_alphanumeric_data(payload, out),
            Mode::Byte => push_byte_data(payload, out),
            Mode::Kanji => push_kanji_data(payload, out),
        }
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = (chunk.len() * 10 + 2) / 3;
            out.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = (chunk.len() * 11 + 1) / 2;
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            out.push_bits(Mode::Byte.encode_chunk(chunk), 8);
        }
    }

    fn push_kanji_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks_exact(2) {
            out.push_bits(Mode::Kanji.encode_chunk(chunk), 13);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc as u16, 8);
        });
    }

}
