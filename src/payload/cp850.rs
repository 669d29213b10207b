//! Code page 850 text decoding for parameter names and units.
//!
//! The lower half is ASCII; the upper half maps through a fixed table.

const CP850_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
    // 0xD0
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
    // 0xE0
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
    // 0xF0
    '\u{AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{A0}',
];

/// Maps one CP850 byte to its character.
pub fn decode_char(byte: u8) -> char {
    if byte < 0x80 {
        byte as char
    } else {
        CP850_HIGH[(byte - 0x80) as usize]
    }
}

/// Decodes a CP850 byte string. Every byte maps, so this never fails.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(decode_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(decode(b"Kesseltemp"), "Kesseltemp");
    }

    #[test]
    fn test_german_umlauts() {
        assert_eq!(decode(&[0x41, 0x75, 0xE1, 0x65, 0x6E]), "Außen");
        assert_eq!(decode(&[0x81, 0x84, 0x94]), "üäö");
        assert_eq!(decode_char(0xF8), '°');
    }
}
