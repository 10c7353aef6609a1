// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime};
// self
use siaga::{
	auth::{Identity, Profile, ReportId, UserId},
	error::Error,
	feed::{EMERGENCY_CONTACTS, FeedContent},
	gate::{ANONYMOUS_REPORTER, AccessDecision, FeedView, ReportTarget},
	report::ReportDesk,
	session::{ProfileState, Session},
	store::{MemoryStore, ProfileStore, ReportStore},
};

fn identity(id: &str, email: &str) -> Identity {
	Identity::new(UserId::new(id).expect("User fixture should be valid."), email)
}

fn pending(id: &str, email: &str) -> Session {
	Session::Authenticated { identity: identity(id, email), profile: ProfileState::Pending }
}

/// Loads a profile through the store so the admin flag comes from the backend.
async fn loaded(store: &MemoryStore, id: &str, email: &str, admin: bool) -> Session {
	let user = UserId::new(id).expect("User fixture should be valid.");

	ProfileStore::set(store, &user, Profile::new(id, email))
		.await
		.expect("Seeding a memory profile should succeed.");

	if admin {
		assert!(store.promote_admin(&user));
	}

	let profile = ProfileStore::get(store, &user)
		.await
		.expect("Reading a memory profile should succeed.")
		.expect("Seeded profile should exist.");

	Session::Authenticated { identity: identity(id, email), profile: ProfileState::Loaded(profile) }
}

#[tokio::test]
async fn citizens_file_into_laporan_and_admins_into_alerts() {
	let store = MemoryStore::default();
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let citizen = pending("u1", "warga@x.com");
	let admin = loaded(&store, "u2", "admin@x.com", true).await;
	let filed = desk.submit(&citizen, "Pohon tumbang di Jl. Dago").await.expect("Citizen submit.");
	let alert = desk.submit(&admin, "Banjir di Cicaheum").await.expect("Admin submit.");

	assert_eq!(filed.target, ReportTarget::Laporan);
	assert!(!filed.is_alert());
	assert_eq!(alert.target, ReportTarget::Alerts);

	let report = ReportStore::get(&store, ReportTarget::Laporan, &filed.id)
		.await
		.expect("Reading a memory report should succeed.")
		.expect("Submitted report should exist.");

	assert_eq!(report.text, "Pohon tumbang di Jl. Dago");
	assert_eq!(report.reporter, "warga@x.com");
}

#[tokio::test]
async fn submit_requires_an_identity_and_text() {
	let desk = ReportDesk::new(Arc::new(MemoryStore::default()));

	for session in [Session::Unknown, Session::Anonymous] {
		assert!(matches!(desk.submit(&session, "Longsor").await, Err(Error::LoginRequired)));
	}

	assert!(matches!(
		desk.submit(&pending("u1", "a@x.com"), "   ").await,
		Err(Error::InvalidReport { .. })
	));
}

#[tokio::test]
async fn identity_without_email_reports_as_anonymous() {
	let store = MemoryStore::default();
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let submission =
		desk.submit(&pending("u1", ""), "Kebakaran").await.expect("Submit should succeed.");
	let report = ReportStore::get(&store, ReportTarget::Laporan, &submission.id)
		.await
		.expect("Reading a memory report should succeed.")
		.expect("Submitted report should exist.");

	assert_eq!(report.reporter, ANONYMOUS_REPORTER);
}

#[tokio::test]
async fn non_privileged_sessions_cannot_review_or_escalate() {
	let store = MemoryStore::default();
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let citizen = loaded(&store, "u1", "warga@x.com", false).await;
	let submission = desk.submit(&citizen, "Banjir").await.expect("Submit should succeed.");

	for session in [Session::Unknown, Session::Anonymous, pending("u2", "b@x.com"), citizen] {
		assert!(matches!(
			desk.incoming(&session).await,
			Err(Error::Forbidden { action: "review" })
		));
		assert!(matches!(
			desk.escalate(&session, &submission.id).await,
			Err(Error::Forbidden { action: "escalate" })
		));
	}

	assert_eq!(
		ReportStore::list(&store, ReportTarget::Laporan)
			.await
			.expect("Listing memory reports should succeed.")
			.len(),
		1
	);
}

#[tokio::test]
async fn escalation_moves_a_report_into_alerts() {
	let store = MemoryStore::default();
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let citizen = pending("u1", "warga@x.com");
	let admin = loaded(&store, "u2", "admin@x.com", true).await;
	let before = OffsetDateTime::now_utc() - Duration::seconds(1);
	let submission = desk.submit(&citizen, "Longsor di Lembang").await.expect("Submit.");
	let incoming = desk.incoming(&admin).await.expect("Admin should list incoming reports.");

	assert_eq!(incoming.len(), 1);
	assert_eq!(incoming[0].id, submission.id);

	let alert_id = desk.escalate(&admin, &submission.id).await.expect("Escalation should succeed.");

	assert!(desk.incoming(&admin).await.expect("Admin listing.").is_empty());

	let alerts = desk.alerts_since(before).await.expect("Alerts should list.");

	assert_eq!(alerts.len(), 1);
	assert_eq!(alerts[0].id, alert_id);
	assert_eq!(alerts[0].text, "Longsor di Lembang");
	assert_eq!(alerts[0].reporter, "warga@x.com");
	assert!(
		desk.alerts_since(OffsetDateTime::now_utc() + Duration::minutes(1))
			.await
			.expect("Alerts should list.")
			.is_empty()
	);

	let missing = ReportId::new("missing").expect("Report fixture should be valid.");

	assert!(matches!(desk.escalate(&admin, &missing).await, Err(Error::ReportNotFound { .. })));
	assert!(matches!(
		desk.escalate(&admin, &submission.id).await,
		Err(Error::ReportNotFound { .. })
	));
}

#[tokio::test]
async fn alerts_since_returns_oldest_first() {
	let store = MemoryStore::default();
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let admin = loaded(&store, "u2", "admin@x.com", true).await;
	let before = OffsetDateTime::now_utc() - Duration::seconds(1);
	let first = desk.submit(&admin, "Pertama").await.expect("First alert.");

	tokio::time::sleep(std::time::Duration::from_millis(5)).await;

	let second = desk.submit(&admin, "Kedua").await.expect("Second alert.");
	let alerts = desk.alerts_since(before).await.expect("Alerts should list.");

	assert_eq!(
		alerts.iter().map(|alert| alert.id.clone()).collect::<Vec<_>>(),
		[first.id, second.id]
	);
}

#[tokio::test]
async fn feed_follows_the_access_decision() {
	let store = MemoryStore::default();
	let desk = ReportDesk::new(Arc::new(store.clone()));
	let admin = loaded(&store, "u2", "admin@x.com", true).await;
	let citizen = pending("u1", "warga@x.com");

	desk.submit(&citizen, "Pohon tumbang").await.expect("Submit should succeed.");

	let decision = AccessDecision::from_session(&admin);
	let content = FeedContent::load(&decision, &desk, &admin).await.expect("Admin feed.");

	assert_eq!(decision.feed_view, FeedView::Admin);
	assert!(matches!(&content, FeedContent::Reports(reports) if reports.len() == 1));

	let decision = AccessDecision::from_session(&citizen);
	let content = FeedContent::load(&decision, &desk, &citizen).await.expect("Citizen feed.");

	assert_eq!(content, FeedContent::EmergencyContacts(EMERGENCY_CONTACTS));
}
