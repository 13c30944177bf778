//! A length-prefixed wrapper around [`crate::basen::cc_alpha_encode`]/[`cc_alpha_decode`] shared
//! by the exchange objects' wire codecs (spec §4.9's range-coded string fields).
//!
//! `cc_alpha_decode` needs the original character count up front and does not report how many
//! input bytes it consumed, so a range-coded field embedded in a larger frame can't be delimited
//! by the coder alone. These wire fields therefore carry an explicit one-byte character count and
//! one-byte encoded-length prefix ahead of the coded bytes.

use crate::basen::{Alphabet, cc_alpha_decode, cc_alpha_encode};
use crate::error::{ErrorKind, Result, err};

pub fn encode_range_coded(alphabet: &Alphabet, data: &[u8]) -> Result<Vec<u8>> {
    let encoded = cc_alpha_encode(alphabet, data)?;
    let mut out = Vec::with_capacity(2 + encoded.len());
    out.push(u8::try_from(data.len()).map_err(|_| err!(ErrorKind::ValueOverflow, "range-coded field too long"))?);
    out.push(u8::try_from(encoded.len()).map_err(|_| err!(ErrorKind::ValueOverflow, "range-coded field too long"))?);
    out.extend_from_slice(&encoded);
    Ok(out)
}

pub fn decode_range_coded(alphabet: &Alphabet, bytes: &[u8], pos: &mut usize) -> Result<String> {
    if *pos + 2 > bytes.len() {
        return Err(err!(ErrorKind::BufferOverflow, "truncated range-coded field"));
    }
    let nchars = bytes[*pos] as usize;
    let enc_len = bytes[*pos + 1] as usize;
    *pos += 2;
    if *pos + enc_len > bytes.len() {
        return Err(err!(ErrorKind::BufferOverflow, "truncated range-coded field body"));
    }
    let decoded = cc_alpha_decode(alphabet, &bytes[*pos..*pos + enc_len], nchars);
    *pos += enc_len;
    String::from_utf8(decoded).map_err(|_| err!(ErrorKind::InvalidChar, "range-coded field is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basen::base32;

    #[test]
    fn round_trips_through_a_larger_buffer() {
        let mut buf = vec![0xAAu8, 0xBB];
        buf.extend_from_slice(&encode_range_coded(base32(), b"HELLO").unwrap());
        buf.extend_from_slice(b"TRAILING");

        let mut pos = 2usize;
        let decoded = decode_range_coded(base32(), &buf, &mut pos).unwrap();
        assert_eq!(decoded, "HELLO");
        assert_eq!(&buf[pos..], b"TRAILING");
    }
}
