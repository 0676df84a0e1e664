use serde::{Serialize, de::DeserializeOwned};

use super::{Cbor, Codec, Cryptographer, Error};

/// Encrypt (almost) anything, with (almost) anything as the password.
///
/// A [`FriendlyCryptographer`] works just like a [`Cryptographer`], except that rather than
/// dealing only in byte strings, the plaintext and the password can be any type that serde can
/// serialize.  Both are turned into bytes by a [`Codec`] (CBOR, unless you say otherwise), and
/// the decrypted bytes are turned back into a value of whatever type you ask for.
///
/// # Choose your passwords carefully
///
/// Encryption is only as repeatable as the password's serialized form.  Two `HashSet`s
/// containing the same strings are equal, but they don't necessarily serialize to the same bytes,
/// and so encrypting with one and decrypting with the other may well fail.  Strings, byte strings,
/// numbers, and values built from ordered collections are safe; see [`Codec`] for the details.
///
/// # Example
///
/// ```rust
/// use friendly_box::{Error, FriendlyCryptographer};
/// use std::collections::BTreeMap;
/// # fn main() -> Result<(), Error> {
///
/// let cryptographer = FriendlyCryptographer::new(b"NaCl", 10_000)?;
///
/// let mut record = BTreeMap::new();
/// record.insert("name".to_string(), "Alice".to_string());
/// record.insert("favourite colour".to_string(), "blue".to_string());
///
/// // The password can be a structured value too
/// let password = ("alice", 2102);
///
/// let ciphertext = cryptographer.encrypt(&record, &password)?;
/// let decrypted: BTreeMap<String, String> = cryptographer.decrypt(&ciphertext, &password)?;
///
/// assert_eq!(record, decrypted);
///
/// let result = cryptographer.decrypt::<BTreeMap<String, String>, _>(&ciphertext, &("alice", 2103));
/// assert!(matches!(result, Err(Error::Decryption)));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct FriendlyCryptographer<C = Cbor> {
	cryptographer: Cryptographer,
	codec: C,
}

impl FriendlyCryptographer<Cbor> {
	/// Create a new [`FriendlyCryptographer`] that serializes values with [`Cbor`].
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] if `iterations` is zero.
	pub fn new(salt: impl AsRef<[u8]>, iterations: u32) -> Result<Self, Error> {
		Ok(Cryptographer::new(salt, iterations)?.into())
	}
}

impl From<Cryptographer> for FriendlyCryptographer<Cbor> {
	fn from(cryptographer: Cryptographer) -> Self {
		Self::with_codec(cryptographer, Cbor)
	}
}

impl<C: Codec> FriendlyCryptographer<C> {
	/// Wrap an existing [`Cryptographer`], serializing values with the given [`Codec`].
	pub fn with_codec(cryptographer: Cryptographer, codec: C) -> Self {
		Self {
			cryptographer,
			codec,
		}
	}

	/// The [`Cryptographer`] that does the actual encryption.
	pub fn cryptographer(&self) -> &Cryptographer {
		&self.cryptographer
	}

	/// Serialize and encrypt `plaintext`, using the serialized form of `password` as the password.
	///
	/// # Errors
	///
	/// Returns [`Error::Serialization`] if either value can't be serialized by the codec, and
	/// otherwise anything that [`Cryptographer::encrypt`] can return.
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn encrypt<T, P>(&self, plaintext: &T, password: &P) -> Result<Vec<u8>, Error>
	where
		T: Serialize + ?Sized,
		P: Serialize + ?Sized,
	{
		let plaintext = self
			.codec
			.serialize(plaintext)
			.map_err(|e| Error::serialization("plaintext", e))?;

		self.cryptographer.encrypt(plaintext, self.password(password)?)
	}

	/// Decrypt a ciphertext produced by [`encrypt`](FriendlyCryptographer::encrypt), and
	/// deserialize the result as a `T`.
	///
	/// # Errors
	///
	/// Returns [`Error::Decryption`] under all the same circumstances as
	/// [`Cryptographer::decrypt`], [`Error::Serialization`] if the password can't be serialized,
	/// and [`Error::Deserialization`] if the decrypted bytes aren't a valid serialized `T` (for
	/// instance, if you ask for a different type than was encrypted).
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn decrypt<T, P>(&self, ciphertext: impl AsRef<[u8]>, password: &P) -> Result<T, Error>
	where
		T: DeserializeOwned,
		P: Serialize + ?Sized,
	{
		let plaintext = self
			.cryptographer
			.decrypt(ciphertext, self.password(password)?)?;

		self.codec
			.deserialize(&plaintext)
			.map_err(Error::deserialization)
	}

	fn password<P: Serialize + ?Sized>(&self, password: &P) -> Result<Vec<u8>, Error> {
		self.codec
			.serialize(password)
			.map_err(|e| Error::serialization("password", e))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Json, tests::init};
	use ciborium::Value;
	use serde::Deserialize;
	use std::{
		collections::{BTreeSet, HashMap, HashSet},
		fmt::Debug,
	};

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct ExampleObj {
		name: String,
		tags: Vec<String>,
		parent: Option<Box<ExampleObj>>,
	}

	fn example_obj() -> ExampleObj {
		ExampleObj {
			name: "child".to_string(),
			tags: vec!["a".to_string(), "b".to_string()],
			parent: Some(Box::new(ExampleObj {
				name: "parent".to_string(),
				tags: vec![],
				parent: None,
			})),
		}
	}

	fn text(s: &str) -> Value {
		Value::Text(s.to_string())
	}

	fn nested_map() -> Value {
		Value::Map(vec![
			(text("key"), text("value")),
			(text("another"), Value::Integer(123.into())),
			(
				text("nested"),
				Value::Map(vec![
					(Value::Integer(1.into()), Value::Null),
					(text("list"), Value::Array(vec![Value::Bool(true), text("x")])),
				]),
			),
		])
	}

	fn password_set() -> HashSet<String> {
		["password", "as", "a", "set"]
			.into_iter()
			.map(String::from)
			.collect()
	}

	fn salts() -> Vec<Vec<u8>> {
		vec![
			Vec::new(),
			b"abcdef".to_vec(),
			crate::generate_salt().to_vec(),
		]
	}

	fn assert_round_trip<T, P>(data: &T, password: &P)
	where
		T: Serialize + DeserializeOwned + PartialEq + Debug,
		P: Serialize + ?Sized,
	{
		for salt in salts() {
			let fc = FriendlyCryptographer::new(&salt, 1).unwrap();

			let ciphertext = fc.encrypt(data, password).unwrap();
			let decrypted: T = fc.decrypt(&ciphertext, password).expect("decryption failed");

			assert_eq!(data, &decrypted);
		}
	}

	fn assert_round_trip_all_passwords<T>(data: &T)
	where
		T: Serialize + DeserializeOwned + PartialEq + Debug,
	{
		assert_round_trip(data, b"MySecur3Pas5w0rd");
		assert_round_trip(data, "mypassword");
		assert_round_trip(data, &2102);
		assert_round_trip(data, &None::<u8>);
		assert_round_trip(data, &password_set());
		assert_round_trip(data, &example_obj());
	}

	#[test]
	fn bytes() {
		init();
		assert_round_trip_all_passwords(&b"secured data".to_vec());
	}

	#[test]
	fn strings() {
		init();
		assert_round_trip_all_passwords(&"regular string data".to_string());
	}

	#[test]
	fn maps() {
		init();
		assert_round_trip_all_passwords(&nested_map());

		let m: HashMap<String, u32> = [("key".to_string(), 1), ("another".to_string(), 123)]
			.into_iter()
			.collect();
		assert_round_trip_all_passwords(&m);
	}

	#[test]
	fn sets() {
		init();
		let s: HashSet<String> = ["1", "2", "3", "hello!"].into_iter().map(String::from).collect();
		assert_round_trip_all_passwords(&s);
	}

	#[test]
	fn numbers() {
		init();
		assert_round_trip_all_passwords(&123);
		assert_round_trip_all_passwords(&-1.5f64);
	}

	#[test]
	fn structs() {
		init();
		assert_round_trip_all_passwords(&example_obj());
	}

	#[test]
	fn nothing() {
		init();
		assert_round_trip_all_passwords(&None::<String>);
		assert_round_trip_all_passwords(&());
	}

	#[test]
	fn wrong_password() {
		init();
		let fc = FriendlyCryptographer::new(b"", 1).unwrap();

		let ciphertext = fc.encrypt(&nested_map(), "mypassword").unwrap();

		let result = fc.decrypt::<Value, _>(&ciphertext, "my password");
		assert!(matches!(result, Err(Error::Decryption)));

		// Same bytes, different type, different serialization
		let result = fc.decrypt::<Value, _>(&ciphertext, b"mypassword");
		assert!(matches!(result, Err(Error::Decryption)));
	}

	#[test]
	fn wrong_type() {
		init();
		let fc = FriendlyCryptographer::new(b"", 1).unwrap();

		let ciphertext = fc.encrypt("regular string data", &2102).unwrap();

		let result = fc.decrypt::<u64, _>(&ciphertext, &2102);
		assert!(matches!(result, Err(Error::Deserialization { .. })));
	}

	#[test]
	fn interoperates_with_plain_cryptographer() {
		init();
		let c = Cryptographer::new(b"abcdef", 1).unwrap();
		let fc: FriendlyCryptographer = c.clone().into();

		let password = Cbor.serialize("mypassword").unwrap();
		let ciphertext = c
			.encrypt(Cbor.serialize(&example_obj()).unwrap(), &password)
			.unwrap();

		assert_eq!(
			example_obj(),
			fc.decrypt::<ExampleObj, _>(&ciphertext, "mypassword").unwrap()
		);
		assert_eq!(b"abcdef", fc.cryptographer().salt());
	}

	#[test]
	fn json_codec() {
		init();
		let fc = FriendlyCryptographer::with_codec(Cryptographer::new(b"", 1).unwrap(), Json);

		let ciphertext = fc.encrypt(&example_obj(), &("user", 42)).unwrap();
		assert_eq!(
			example_obj(),
			fc.decrypt::<ExampleObj, _>(&ciphertext, &("user", 42)).unwrap()
		);

		// A CBOR-encoded password is a different password
		let cbor = FriendlyCryptographer::new(b"", 1).unwrap();
		let result = cbor.decrypt::<ExampleObj, _>(&ciphertext, &("user", 42));
		assert!(matches!(result, Err(Error::Decryption)));
	}

	#[test]
	fn unserializable_values() {
		init();
		let fc = FriendlyCryptographer::with_codec(Cryptographer::new(b"", 1).unwrap(), Json);
		let awkward: HashMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();

		let result = fc.encrypt(&awkward, "mypassword");
		assert!(matches!(
			result,
			Err(Error::Serialization { ref element, .. }) if element == "plaintext"
		));

		let result = fc.encrypt("data", &awkward);
		assert!(matches!(
			result,
			Err(Error::Serialization { ref element, .. }) if element == "password"
		));
	}

	#[test]
	fn equal_primitive_passwords_are_interchangeable() {
		init();
		let fc = FriendlyCryptographer::new(b"", 1).unwrap();

		let ciphertext = fc.encrypt("data", &String::from("mypassword")).unwrap();
		assert_eq!(
			"data",
			fc.decrypt::<String, _>(&ciphertext, &("mypass".to_string() + "word"))
				.unwrap()
		);

		let ciphertext = fc.encrypt("data", &vec![1u8, 2, 3]).unwrap();
		assert_eq!(
			"data",
			fc.decrypt::<String, _>(&ciphertext, &[1u8, 2, 3][..]).unwrap()
		);

		let ciphertext = fc.encrypt("data", &2102u64).unwrap();
		assert_eq!("data", fc.decrypt::<String, _>(&ciphertext, &2102i32).unwrap());

		let a: BTreeSet<&str> = ["password", "as", "a", "set"].into_iter().collect();
		let b: BTreeSet<String> = ["set", "a", "as", "password"]
			.into_iter()
			.map(String::from)
			.collect();
		let ciphertext = fc.encrypt("data", &a).unwrap();
		assert_eq!("data", fc.decrypt::<String, _>(&ciphertext, &b).unwrap());
	}

	// Two equal HashSets needn't iterate in the same order, so their serializations (and hence
	// the derived keys) can differ.  This passes or fails depending on the hasher's random seeds.
	#[test]
	#[ignore = "HashSet serialization order is not stable across instances"]
	fn equal_hashset_passwords_may_not_be_interchangeable() {
		init();
		let fc = FriendlyCryptographer::new(b"", 1).unwrap();

		let a: HashSet<u32> = (0..64).collect();
		let b: HashSet<u32> = (0..64).rev().collect();
		assert_eq!(a, b);

		let ciphertext = fc.encrypt("data", &a).unwrap();
		assert_eq!("data", fc.decrypt::<String, _>(&ciphertext, &b).unwrap());
	}
}
