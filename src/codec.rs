use serde::{Serialize, de::DeserializeOwned};

/// The error type returned by [`Codec`] implementations.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Turns values into bytes, and back again, so that a
/// [`FriendlyCryptographer`](super::FriendlyCryptographer) can encrypt them (and use them as
/// passwords).
///
/// # Canonical encodings
///
/// Nothing requires a [`Codec`] to produce the *same* bytes for two values that compare equal.
/// Neither of the codecs provided here do, for the simple reason that serde serializes a
/// `HashMap` or `HashSet` in whatever order it happens to iterate, and that order differs between
/// two separately-built, but equal, collections.  For plaintexts this doesn't matter, but it
/// *does* matter for passwords: decrypting with an equal-but-different password value may fail.
///
/// Strings, byte strings, numbers, and anything built from ordered collections (`Vec`,
/// `BTreeMap`, `BTreeSet`, structs) serialize stably, and make perfectly good passwords.
pub trait Codec {
	/// Serialize a value to bytes.
	///
	/// # Errors
	///
	/// Returns whatever error the underlying serializer produced, if the value could not be
	/// represented in this encoding.
	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

	/// Reconstruct a value from bytes previously produced by [`serialize`](Codec::serialize).
	///
	/// # Errors
	///
	/// Returns whatever error the underlying deserializer produced, if the bytes are not a valid
	/// serialization of a `T`.
	fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Compact binary serialization, using [CBOR](https://cbor.io/).
///
/// This is the default, and handles pretty much anything serde can throw at it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cbor;

impl Codec for Cbor {
	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
		let mut v: Vec<u8> = Vec::new();
		ciborium::into_writer(value, &mut v)?;
		Ok(v)
	}

	fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
		Ok(ciborium::from_reader(bytes)?)
	}
}

/// Serialization as JSON.
///
/// Bulkier than [`Cbor`], and fussier (map keys must be strings), but handy if you want to be
/// able to read a plaintext with other tools after decrypting it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Json;

impl Codec for Json {
	fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
		Ok(serde_json::to_vec(value)?)
	}

	fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
		Ok(serde_json::from_slice(bytes)?)
	}
}
