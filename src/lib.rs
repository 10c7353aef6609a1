//! Client core for a city disaster-reporting app: flicker-free session resolution, fail-closed
//! access gating, incident reporting and open-data history shaping.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod feed;
pub mod gate;
pub mod history;
pub mod obs;
pub mod provider;
pub mod report;
pub mod session;
pub mod spawn;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap, VecDeque},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		mem,
		pin::Pin,
		str::FromStr,
		sync::{Arc, Weak},
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
