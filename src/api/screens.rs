//! Screens that permissions are granted against.

// self
use crate::{
	_prelude::*,
	api::{MessageResponse, resource_handle},
	http::HttpTransport,
};

/// Whether a screen is offered to users.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScreenStatus {
	/// Visible.
	#[default]
	Active,
	/// Hidden.
	Inactive,
}

/// Back office screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
	/// Identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Short description.
	#[serde(default)]
	pub description: String,
	/// Client route the screen lives at.
	pub route: String,
	/// Availability.
	#[serde(default)]
	pub status: ScreenStatus,
	/// Creation timestamp.
	#[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Last update timestamp.
	#[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
}

/// Payload for `POST screen`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScreen {
	/// Display name.
	pub name: String,
	/// Short description.
	pub description: String,
	/// Client route.
	pub route: String,
	/// Availability.
	pub status: ScreenStatus,
}

/// Partial update for `PUT screen/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateScreen {
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Short description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Availability.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<ScreenStatus>,
}

resource_handle!(
	/// Screen management endpoints (admin only).
	Screens,
	screens
);
impl<T> Screens<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET screen`.
	pub async fn all(&self) -> Result<Vec<Screen>> {
		self.session.get("screen").await?.into_result()
	}

	/// `GET screen/{id}`.
	pub async fn get(&self, id: &str) -> Result<Screen> {
		self.session.get(&format!("screen/{id}")).await?.into_result()
	}

	/// `POST screen`.
	pub async fn create(&self, screen: &NewScreen) -> Result<Screen> {
		self.session.post("screen", screen).await?.into_result()
	}

	/// `PUT screen/{id}`.
	pub async fn update(&self, id: &str, changes: &UpdateScreen) -> Result<Screen> {
		self.session.put(&format!("screen/{id}"), changes).await?.into_result()
	}

	/// `DELETE screen/{id}`.
	pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
		self.session.delete(&format!("screen/{id}")).await?.into_result()
	}
}
