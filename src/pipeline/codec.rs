//! Whole-buffer gzip and deflate decoders shared by the transfer and container stages.

use std::io::{self, Read};

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};

use super::constants::GZIP_MAGIC;

/// Decompresses a complete gzip stream.
///
/// Input that does not start with a gzip header is rejected outright,
/// including an empty buffer.
pub(crate) fn gunzip(data: &[u8]) -> io::Result<Vec<u8>> {
    if !data.starts_with(&GZIP_MAGIC[..2]) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "missing gzip header",
        ));
    }
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// Inflates a `deflate` content-coding body.
///
/// The coding is defined as zlib-wrapped deflate, but enough servers send a
/// bare deflate stream that both are accepted: a valid zlib header selects
/// the zlib decoder, anything else is treated as raw deflate.
pub(crate) fn inflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    if has_zlib_header(data) {
        ZlibDecoder::new(data).read_to_end(&mut out)?;
    } else {
        DeflateDecoder::new(data).read_to_end(&mut out)?;
    }
    Ok(out)
}

/// CM must be 8 (deflate) and the two header bytes must be a multiple of 31.
fn has_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => cmf & 0x0F == 8 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0,
        _ => false,
    }
}
