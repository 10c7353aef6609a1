//! Walks one citizen and one administrator through sign-up, reporting, and escalation using
//! the in-memory provider and store with profile lookups running on Tokio.

// std
use std::{sync::Arc, time::Duration};
// crates.io
use color_eyre::Result;
// self
use siaga::{
	auth::Password,
	feed::FeedContent,
	provider::MemoryIdentityProvider,
	report::ReportDesk,
	session::{Session, SessionResolver},
	spawn::TokioSpawner,
	store::MemoryStore,
};

async fn settle(resolver: &SessionResolver) {
	for _ in 0..50 {
		if !resolver.current_session().is_profile_pending() {
			return;
		}

		tokio::time::sleep(Duration::from_millis(10)).await;
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let provider = MemoryIdentityProvider::default();
	let store = MemoryStore::default();
	let resolver = SessionResolver::start(
		Arc::new(provider.clone()),
		Arc::new(store.clone()),
		Arc::new(TokioSpawner::default()),
	);
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let _subscription = resolver.subscribe(|session: &Session| match session {
		Session::Unknown => println!("session: resolving"),
		Session::Anonymous => println!("session: signed out"),
		Session::Authenticated { identity, profile } => {
			let loaded = profile.profile().is_some();

			println!("session: {} (profile loaded: {loaded})", identity.email)
		},
	});

	let citizen = resolver.sign_up("warga@bandung.id", &Password::new("rahasia1"), "Warga").await?;

	settle(&resolver).await;

	let filed = desk.submit(&resolver.current_session(), "Pohon tumbang di Jl. Dago").await?;

	println!("{} filed report {} into {}.", citizen.identity.email, filed.id, filed.target);

	resolver.sign_out().await?;

	let admin_password = Password::new("rahasia2");
	let admin = resolver.sign_up("admin@bandung.id", &admin_password, "Petugas").await?;

	// Promotion happens on the backend; the next sign-in picks up the flag.
	store.promote_admin(&admin.identity.id);
	resolver.sign_out().await?;
	resolver.sign_in("admin@bandung.id", &admin_password).await?;
	settle(&resolver).await;

	let session = resolver.current_session();
	let access = resolver.access();

	println!("Privileged: {}, feed: {}.", access.is_privileged, access.feed_view.as_str());

	if let FeedContent::Reports(reports) = FeedContent::load(&access, &desk, &session).await? {
		for report in reports {
			let alert = desk.escalate(&session, &report.id).await?;

			println!("Escalated {} ({}) as alert {alert}.", report.id, report.text);
		}
	}

	resolver.shutdown();

	Ok(())
}
