use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use secrecy::{ExposeSecret as _, SecretString};

/// A key derived from a password by a [`Cryptographer`](super::Cryptographer).
#[derive(Debug)]
pub struct Key(secrecy::SecretBox<[u8; 32]>);

impl Key {
	pub fn expose_secret(&self) -> &[u8; 32] {
		self.0.expose_secret()
	}

	/// The URL-safe base64 form of the key, which is what the Fernet token scheme takes as its key.
	pub fn to_base64(&self) -> SecretString {
		URL_SAFE.encode(self.expose_secret()).into()
	}
}

impl Clone for Key {
	fn clone(&self) -> Self {
		Self(Box::new(*self.expose_secret()).into())
	}
}

impl From<Box<[u8; 32]>> for Key {
	fn from(k: Box<[u8; 32]>) -> Self {
		Key(k.into())
	}
}

impl PartialEq for Key {
	fn eq(&self, other: &Self) -> bool {
		constant_time_eq::constant_time_eq_n(self.expose_secret(), other.expose_secret())
	}
}

impl Eq for Key {}

/// Create a random salt suitable for passing to [`Cryptographer::new`](super::Cryptographer::new).
///
/// The salt isn't secret, but it *is* required to decrypt anything encrypted with it, so store
/// it alongside your ciphertexts.
#[tracing::instrument(level = "debug")]
pub fn generate_salt() -> [u8; 16] {
	use rand::{RngCore, rng};

	let mut s = [0u8; 16];

	rng().fill_bytes(&mut s);

	s
}
