//! In-process identity provider for local development, demos, and tests.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{Identity, Password, UserId},
	error::AuthError,
	provider::{IdentityListener, IdentityProvider, IdentitySubscription, ProviderFuture},
};

const UID_LEN: usize = 28;
const SALT_LEN: usize = 16;
/// Minimum password length accepted by [`MemoryIdentityProvider::create_account`].
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
struct Account {
	identity: Identity,
	salt: String,
	digest: String,
}

#[derive(Default)]
struct ProviderState {
	accounts: HashMap<String, Account>,
	current: Option<Identity>,
	listeners: BTreeMap<u64, IdentityListener>,
	next_listener: u64,
	unreachable: bool,
}

/// Keeps accounts in memory and emits identity transitions synchronously.
///
/// Passwords are stored as salted SHA-256 digests. Use [`set_reachable`](Self::set_reachable)
/// to simulate an offline provider and [`force_identity`](Self::force_identity) to simulate
/// provider-side transitions such as session restore or token invalidation.
#[derive(Clone, Default)]
pub struct MemoryIdentityProvider(Arc<Mutex<ProviderState>>);
impl MemoryIdentityProvider {
	/// Toggles whether calls succeed or fail with [`AuthError::Unreachable`].
	pub fn set_reachable(&self, reachable: bool) {
		self.0.lock().unreachable = !reachable;
	}

	/// Replaces the current identity and notifies subscribers, bypassing credentials.
	pub fn force_identity(&self, identity: Option<Identity>) {
		self.0.lock().current = identity.clone();
		self.emit(identity);
	}

	/// Currently signed-in identity, if any.
	pub fn current(&self) -> Option<Identity> {
		self.0.lock().current.clone()
	}

	/// Number of active subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.0.lock().listeners.len()
	}

	fn emit(&self, event: Option<Identity>) {
		let listeners: Vec<_> = self.0.lock().listeners.values().cloned().collect();

		for listener in listeners {
			listener(event.clone());
		}
	}

	fn ensure_reachable(state: &ProviderState) -> Result<(), AuthError> {
		if state.unreachable {
			Err(AuthError::Unreachable { message: "memory provider is offline".into() })
		} else {
			Ok(())
		}
	}

	fn sign_in_now(&self, email: &str, password: &Password) -> Result<Identity, AuthError> {
		let identity = {
			let mut state = self.0.lock();

			Self::ensure_reachable(&state)?;

			let account =
				state.accounts.get(&normalize(email)).ok_or(AuthError::InvalidCredentials)?;

			if digest(&account.salt, password) != account.digest {
				return Err(AuthError::InvalidCredentials);
			}

			let identity = account.identity.clone();

			state.current = Some(identity.clone());

			identity
		};

		self.emit(Some(identity.clone()));

		Ok(identity)
	}

	fn create_now(&self, email: &str, password: &Password) -> Result<Identity, AuthError> {
		let identity = {
			let mut state = self.0.lock();

			Self::ensure_reachable(&state)?;

			let key = normalize(email);

			if !is_plausible_email(&key) {
				return Err(AuthError::InvalidEmail);
			}
			if password.char_len() < MIN_PASSWORD_LEN {
				return Err(AuthError::WeakPassword { min: MIN_PASSWORD_LEN });
			}
			if state.accounts.contains_key(&key) {
				return Err(AuthError::EmailInUse);
			}

			let id = UserId::new(random_string(UID_LEN))
				.map_err(|e| AuthError::Provider { message: e.to_string() })?;
			let identity = Identity::new(id, email.trim());
			let salt = random_string(SALT_LEN);
			let account =
				Account { identity: identity.clone(), digest: digest(&salt, password), salt };

			state.accounts.insert(key, account);
			state.current = Some(identity.clone());

			identity
		};

		self.emit(Some(identity.clone()));

		Ok(identity)
	}

	fn sign_out_now(&self) -> Result<(), AuthError> {
		{
			let mut state = self.0.lock();

			Self::ensure_reachable(&state)?;

			state.current = None;
		}

		self.emit(None);

		Ok(())
	}
}
impl IdentityProvider for MemoryIdentityProvider {
	fn subscribe(&self, listener: IdentityListener) -> IdentitySubscription {
		let (key, current) = {
			let mut state = self.0.lock();
			let key = state.next_listener;

			state.next_listener += 1;
			state.listeners.insert(key, listener.clone());

			(key, state.current.clone())
		};

		listener(current);

		let state = Arc::downgrade(&self.0);

		IdentitySubscription::new(move || {
			if let Some(state) = state.upgrade() {
				state.lock().listeners.remove(&key);
			}
		})
	}

	fn sign_in_with_password<'a>(
		&'a self,
		email: &'a str,
		password: &'a Password,
	) -> ProviderFuture<'a, Identity> {
		Box::pin(async move { self.sign_in_now(email, password) })
	}

	fn create_account<'a>(
		&'a self,
		email: &'a str,
		password: &'a Password,
	) -> ProviderFuture<'a, Identity> {
		Box::pin(async move { self.create_now(email, password) })
	}

	fn sign_out(&self) -> ProviderFuture<'_, ()> {
		Box::pin(async move { self.sign_out_now() })
	}
}
impl Debug for MemoryIdentityProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.0.lock();

		f.debug_struct("MemoryIdentityProvider")
			.field("accounts", &state.accounts.len())
			.field("current", &state.current)
			.field("subscribers", &state.listeners.len())
			.field("reachable", &!state.unreachable)
			.finish()
	}
}

fn normalize(email: &str) -> String {
	email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
	match email.split_once('@') {
		Some((local, domain)) =>
			!local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
		None => false,
	}
}

fn digest(salt: &str, password: &Password) -> String {
	let mut hasher = Sha256::new();

	hasher.update(salt.as_bytes());
	hasher.update(password.expose().as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
