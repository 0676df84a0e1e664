use base64::{
	Engine as _,
	alphabet::URL_SAFE,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::Error;

pub(crate) const VERSION: u8 = 0x80;

const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const TAG_LEN: usize = 32;
const BLOCK_LEN: usize = 16;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

/// The smallest possible envelope: an empty plaintext still pads out to one cipher block.
pub(crate) const MIN_LEN: usize = HEADER_LEN + BLOCK_LEN + TAG_LEN;

// Fernet emits padded tokens, but there's no reason to be fussy about padding on the way in
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&URL_SAFE,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Turn a Fernet token into the raw envelope bytes we hand out.
pub(crate) fn from_token(token: &str) -> Result<Vec<u8>, Error> {
	TOKEN_ENGINE
		.decode(token)
		.map_err(|e| Error::insanity(format!("Fernet produced an undecodable token: {e}")))
}

/// Turn raw envelope bytes back into the token text that Fernet wants to see.
pub(crate) fn to_token(envelope: &[u8]) -> String {
	TOKEN_ENGINE.encode(envelope)
}

/// A read-only view of the fields of an encrypted envelope.
///
/// Nothing here is authenticated: a structurally valid [`Envelope`] may still fail to decrypt,
/// and the creation time can be forged by anyone who can write to wherever the envelope is
/// stored.  It's useful for diagnostics and housekeeping (such as finding old ciphertexts that
/// should be re-encrypted), not for making security decisions.
///
/// # Example
///
/// ```rust
/// use friendly_box::{Cryptographer, Envelope, Error};
/// # fn main() -> Result<(), Error> {
///
/// let cryptographer = Cryptographer::new(b"", 1)?;
/// let ciphertext = cryptographer.encrypt(b"secured data", b"MySecur3Pas5w0rd")?;
///
/// let envelope = Envelope::try_from(&ciphertext[..])?;
/// assert_eq!(0x80, envelope.version());
/// assert_eq!(16, envelope.ciphertext().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Envelope<'a>(&'a [u8]);

impl Envelope<'_> {
	/// The token format version; always `0x80` for anything this crate produces.
	pub fn version(&self) -> u8 {
		self.0[0]
	}

	/// The raw creation timestamp, in seconds since the Unix epoch.
	pub fn timestamp(&self) -> u64 {
		let mut ts = [0u8; TIMESTAMP_LEN];
		ts.copy_from_slice(&self.0[1..1 + TIMESTAMP_LEN]);

		u64::from_be_bytes(ts)
	}

	/// When the envelope claims to have been created, to one-second resolution.
	///
	/// Returns `None` if the timestamp is too far in the future for [`SystemTime`] to represent.
	pub fn created_at(&self) -> Option<SystemTime> {
		UNIX_EPOCH.checked_add(Duration::from_secs(self.timestamp()))
	}

	pub fn iv(&self) -> &[u8] {
		&self.0[1 + TIMESTAMP_LEN..HEADER_LEN]
	}

	/// The padded ciphertext, always a whole number of cipher blocks.
	pub fn ciphertext(&self) -> &[u8] {
		&self.0[HEADER_LEN..self.0.len() - TAG_LEN]
	}

	pub fn tag(&self) -> &[u8] {
		&self.0[self.0.len() - TAG_LEN..]
	}
}

impl<'a> TryFrom<&'a [u8]> for Envelope<'a> {
	type Error = Error;

	fn try_from(b: &'a [u8]) -> Result<Self, Self::Error> {
		if b.len() < MIN_LEN {
			return Err(Error::invalid_envelope("too short"));
		}

		if b[0] != VERSION {
			tracing::debug!(expected = VERSION, actual = b[0], "version mismatch");
			return Err(Error::invalid_envelope("unknown version"));
		}

		if (b.len() - HEADER_LEN - TAG_LEN) % BLOCK_LEN != 0 {
			return Err(Error::invalid_envelope("partial cipher block"));
		}

		Ok(Self(b))
	}
}
