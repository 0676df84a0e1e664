use fernet::Fernet;
use secrecy::ExposeSecret as _;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{Envelope, Error, Key, envelope, kdf};

/// How many rounds of PBKDF2 a [`Cryptographer`] does when you don't ask for something else.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Password-based encryption of byte strings.
///
/// Every call to [`encrypt`](Cryptographer::encrypt) or [`decrypt`](Cryptographer::decrypt)
/// stretches the password into a 256-bit key with PBKDF2-HMAC-SHA256, using the salt and
/// iteration count the [`Cryptographer`] was created with, and then uses that key to produce (or
/// open) a Fernet token: AES-128-CBC encryption, with an HMAC-SHA256 over the whole thing so that
/// any tampering is detected.  The token is handed back as raw bytes, rather than the base64 text
/// Fernet normally deals in, because that's a third smaller.
///
/// Key derivation is deliberately slow, and the key is never cached, so each call costs
/// `iterations` rounds of HMAC.  That's the price of making password guessing expensive.
///
/// The salt is not stored in the ciphertext.  If you use anything other than the default (empty)
/// salt, you'll need to keep it somewhere, because you can't decrypt without it.
///
/// # Example
///
/// ```rust
/// use friendly_box::{Cryptographer, Error};
/// # fn main() -> Result<(), Error> {
///
/// let salt = friendly_box::generate_salt();
/// let cryptographer = Cryptographer::new(salt, 10_000)?;
///
/// let ciphertext = cryptographer.encrypt(b"secured data", b"MySecur3Pas5w0rd")?;
///
/// assert_eq!(
///     b"secured data".to_vec(),
///     cryptographer.decrypt(&ciphertext, b"MySecur3Pas5w0rd")?
/// );
///
/// // Get the password wrong, and all you get is an error
/// let result = cryptographer.decrypt(&ciphertext, b"password123");
/// assert!(matches!(result, Err(Error::Decryption)));
///
/// // Same goes for the salt
/// let result = Cryptographer::new(b"", 10_000)?.decrypt(&ciphertext, b"MySecur3Pas5w0rd");
/// assert!(matches!(result, Err(Error::Decryption)));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Cryptographer {
	salt: Vec<u8>,
	iterations: u32,
	max_age: Option<Duration>,
}

impl Cryptographer {
	/// Create a new [`Cryptographer`].
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] if `iterations` is zero.
	#[tracing::instrument(level = "debug", skip(salt))]
	pub fn new(salt: impl AsRef<[u8]>, iterations: u32) -> Result<Self, Error> {
		if iterations == 0 {
			return Err(Error::configuration("KDF iterations must be at least one"));
		}

		let salt = salt.as_ref().to_vec();
		tracing::debug!(salt_len = salt.len(), "Creating cryptographer");

		Ok(Self {
			salt,
			iterations,
			max_age: None,
		})
	}

	/// Refuse to decrypt anything created more than `max_age` ago (to one second resolution).
	///
	/// This relies on the creation time recorded in the ciphertext, which is covered by the
	/// integrity check, so it can't be altered without detection.
	#[must_use]
	pub fn with_max_age(mut self, max_age: Duration) -> Self {
		self.max_age = Some(max_age);
		self
	}

	/// The salt mixed into every key derivation.
	pub fn salt(&self) -> &[u8] {
		&self.salt
	}

	/// How many rounds of PBKDF2 each key derivation does.
	pub fn iterations(&self) -> u32 {
		self.iterations
	}

	/// The oldest ciphertext this [`Cryptographer`] will decrypt, if there's a limit at all.
	pub fn max_age(&self) -> Option<Duration> {
		self.max_age
	}

	/// Stretch a password into a key, using this [`Cryptographer`]'s salt and iteration count.
	///
	/// The same password, salt, and iteration count always produce the same key.
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn derive_key(&self, password: impl AsRef<[u8]>) -> Key {
		tracing::debug!(
			iterations = self.iterations,
			salt_len = self.salt.len(),
			"Deriving key"
		);
		kdf::derive_key(password.as_ref(), &self.salt, self.iterations)
	}

	/// Encrypt `plaintext`, such that it can only be decrypted with the same `password`
	/// (and a [`Cryptographer`] with the same salt and iteration count).
	///
	/// The result is `57 + 16 * (plaintext.len() / 16 + 1)` bytes long.
	///
	/// # Errors
	///
	/// Will return [`Error::Insanity`] in the (should-be-impossible) event that the underlying
	/// Fernet implementation rejects our key or produces a malformed token.
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn encrypt(
		&self,
		plaintext: impl AsRef<[u8]>,
		password: impl AsRef<[u8]>,
	) -> Result<Vec<u8>, Error> {
		let fernet = fernet_for(&self.derive_key(password))?;

		tracing::debug!(len = plaintext.as_ref().len(), "Encrypting");
		envelope::from_token(&fernet.encrypt(plaintext.as_ref()))
	}

	/// Decrypt a ciphertext previously produced by [`encrypt`](Cryptographer::encrypt).
	///
	/// # Errors
	///
	/// Will return [`Error::Decryption`] if the password (or salt, or iteration count) is
	/// wrong, if the ciphertext has been corrupted or tampered with, if it was never a ciphertext
	/// in the first place, or if it is older than the configured maximum age.  These are
	/// deliberately indistinguishable.
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn decrypt(
		&self,
		ciphertext: impl AsRef<[u8]>,
		password: impl AsRef<[u8]>,
	) -> Result<Vec<u8>, Error> {
		if ciphertext.as_ref().len() < envelope::MIN_LEN {
			tracing::debug!(len = ciphertext.as_ref().len(), "Ciphertext too short");
			return Err(Error::Decryption);
		}

		let fernet = fernet_for(&self.derive_key(password))?;
		let token = envelope::to_token(ciphertext.as_ref());

		let plaintext = fernet.decrypt(&token).map_err(|_| {
			tracing::debug!(len = ciphertext.as_ref().len(), "Decryption failed");
			Error::Decryption
		})?;

		// Only trust the timestamp once the HMAC has vouched for it
		if let Some(max_age) = self.max_age {
			let created = Envelope::try_from(ciphertext.as_ref())
				.map_err(|_| Error::Decryption)?
				.timestamp();

			if expired(created, max_age) {
				tracing::debug!(created, max_age = max_age.as_secs(), "Ciphertext expired");
				return Err(Error::Decryption);
			}
		}

		Ok(plaintext)
	}
}

fn expired(created: u64, max_age: Duration) -> bool {
	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_or(0, |d| d.as_secs());

	now.saturating_sub(created) > max_age.as_secs()
}

impl Default for Cryptographer {
	/// An empty salt, and [`DEFAULT_ITERATIONS`] rounds of key stretching.
	fn default() -> Self {
		Self {
			salt: Vec::new(),
			iterations: DEFAULT_ITERATIONS,
			max_age: None,
		}
	}
}

fn fernet_for(key: &Key) -> Result<Fernet, Error> {
	Fernet::new(key.to_base64().expose_secret())
		.ok_or_else(|| Error::insanity("Fernet rejected a 32 byte key"))
}
