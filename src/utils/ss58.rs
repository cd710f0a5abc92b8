use blake2::{Blake2b512, Digest};
use thiserror::Error;

const CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const PUBKEY_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum Ss58Error {
	#[error("not valid base58")]
	InvalidBase58,
	#[error("unexpected payload length {0}")]
	BadLength(usize),
	#[error("checksum mismatch")]
	BadChecksum,
	#[error("network prefix {0} outside single-byte range")]
	UnsupportedPrefix(u16),
}

/// Decode an SS58 address into its network prefix and 32-byte public key.
///
/// Only the single-byte prefix form (network ids 0..=63) is supported, which
/// covers every wallet network this service connects to.
pub fn decode(address: &str) -> Result<(u8, [u8; PUBKEY_LEN]), Ss58Error> {
	let data = bs58::decode(address)
		.into_vec()
		.map_err(|_| Ss58Error::InvalidBase58)?;
	if data.len() != 1 + PUBKEY_LEN + CHECKSUM_LEN {
		return Err(Ss58Error::BadLength(data.len()));
	}

	let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
	if body[0] > 63 {
		return Err(Ss58Error::UnsupportedPrefix(body[0] as u16));
	}
	if checksum != &expected_checksum(body)[..] {
		return Err(Ss58Error::BadChecksum);
	}

	let mut pubkey = [0u8; PUBKEY_LEN];
	pubkey.copy_from_slice(&body[1..]);
	Ok((body[0], pubkey))
}

/// Encode a 32-byte public key as an SS58 address under the given network prefix.
pub fn encode(prefix: u8, pubkey: &[u8; PUBKEY_LEN]) -> Result<String, Ss58Error> {
	if prefix > 63 {
		return Err(Ss58Error::UnsupportedPrefix(prefix as u16));
	}

	let mut body = Vec::with_capacity(1 + PUBKEY_LEN + CHECKSUM_LEN);
	body.push(prefix);
	body.extend_from_slice(pubkey);
	let checksum = expected_checksum(&body);
	body.extend_from_slice(&checksum);
	Ok(bs58::encode(body).into_string())
}

/// Chain-neutral form of an SS58 address: the lowercase hex of its public key.
///
/// Two encodings of the same key under different network prefixes normalize
/// to the same value, which is what lets registry records be matched against
/// a wallet's live listing.
pub fn normalize(address: &str) -> Result<String, Ss58Error> {
	let (_, pubkey) = decode(address)?;
	Ok(format!("0x{}", hex::encode(pubkey)))
}

fn expected_checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
	let mut hasher = Blake2b512::new();
	hasher.update(CHECKSUM_PREAMBLE);
	hasher.update(body);
	let digest = hasher.finalize();
	[digest[0], digest[1]]
}
