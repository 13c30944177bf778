//! Base-N text codec (spec §4.3): positional-notation `stringify`/`destringify` over configurable
//! alphabets, plus the `cc_alpha_*` range-coded variable-base encoder.

mod alphabet;
mod rangecoder;
mod stringify;

pub use alphabet::{Alphabet, base10, base16, base32, base34, base57, base58, base64, base95, base224, base256, best_tables};
pub use rangecoder::{
    cc_alpha_decode, cc_alpha_decode_best, cc_alpha_encode, cc_alpha_encode_best, cc_alpha_encode_shortest,
    historical_remap, set_default_decode_tables,
};
pub use stringify::{destringify, stringify};
