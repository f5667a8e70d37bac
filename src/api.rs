//! Typed wrappers for the back office resources.
//!
//! Each resource is a short-lived handle borrowing a [`Session`]. Wrappers collapse the
//! [`ApiResponse`](crate::session::ApiResponse) pair with
//! [`into_result`](crate::session::ApiResponse::into_result), so a failed call surfaces as
//! [`Error::Api`] carrying the mapped message.

pub mod auth;
pub mod dashboard;
pub mod permissions;
pub mod properties;
pub mod rents;
pub mod screens;
pub mod tenants;
pub mod transactions;
pub mod users;
pub mod vendors;

pub use auth::*;
pub use dashboard::*;
pub use permissions::*;
pub use properties::*;
pub use rents::*;
pub use screens::*;
pub use tenants::*;
pub use transactions::*;
pub use users::*;
pub use vendors::*;

// self
use crate::_prelude::*;

/// Rows per page requested by every paginated list screen.
pub const PAGE_SIZE: u32 = 10;

/// One page of a paginated list.
///
/// The backend names the rows after the resource (`vendors`, `tenants`, `items`), so every
/// spelling lands in [`Page::items`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<R> {
	/// Rows on this page.
	#[serde(default = "Vec::new", alias = "vendors", alias = "tenants", alias = "rents")]
	pub items: Vec<R>,
	/// Page count reported by the backend; at least one.
	#[serde(default = "one_page", rename = "totalPages", alias = "total_pages")]
	pub total_pages: u32,
}
impl<R> Default for Page<R> {
	fn default() -> Self {
		Self { items: Vec::new(), total_pages: 1 }
	}
}

/// Acknowledgement returned by delete endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
	/// Server-supplied confirmation text.
	#[serde(default)]
	pub message: String,
}

fn one_page() -> u32 {
	1
}

macro_rules! resource_handle {
	($(#[$meta:meta])* $name:ident, $accessor:ident) => {
		$(#[$meta])*
		pub struct $name<'a, T>
		where
			T: ?Sized + $crate::http::HttpTransport,
		{
			session: &'a $crate::session::Session<T>,
		}
		impl<'a, T> $name<'a, T>
		where
			T: ?Sized + $crate::http::HttpTransport,
		{
			/// Wraps `session`.
			pub fn new(session: &'a $crate::session::Session<T>) -> Self {
				Self { session }
			}
		}
		impl<T> ::std::fmt::Debug for $name<'_, T>
		where
			T: ?Sized + $crate::http::HttpTransport,
		{
			fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
				f.debug_struct(stringify!($name)).field("session", self.session).finish()
			}
		}
		impl<T> $crate::session::Session<T>
		where
			T: ?Sized + $crate::http::HttpTransport,
		{
			#[doc = concat!("Returns the [`", stringify!($name), "`] handle.")]
			pub fn $accessor(&self) -> $name<'_, T> {
				$name::new(self)
			}
		}
	};
}
pub(crate) use resource_handle;

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn page_accepts_resource_named_rows() {
		let vendors: Page<JsonValue> =
			serde_json::from_str(r#"{"vendors":[{"id":"v1"}],"totalPages":3}"#).expect("Vendor page should decode.");
		let items: Page<JsonValue> =
			serde_json::from_str(r#"{"items":[1,2]}"#).expect("Property page should decode.");

		assert_eq!(vendors.items.len(), 1);
		assert_eq!(vendors.total_pages, 3);
		assert_eq!(items.items.len(), 2);
		assert_eq!(items.total_pages, 1);
	}

	#[test]
	fn missing_message_defaults_to_empty() {
		let ack: MessageResponse = serde_json::from_str("{}").expect("Empty ack should decode.");

		assert!(ack.message.is_empty());
	}
}
