//! Screen permissions granted to users.

// self
use crate::{
	_prelude::*,
	api::{MessageResponse, Screen, ScreenStatus, resource_handle},
	http::HttpTransport,
};

/// Admin-side permission record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
	/// Identifier.
	pub id: String,
	/// Grantee.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// Screen the grant applies to.
	#[serde(rename = "screenId")]
	pub screen_id: String,
	/// Access level label, e.g. `read` or `write`.
	#[serde(default)]
	pub permission: String,
	/// Embedded screen, when the backend joins it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub screen: Option<Screen>,
}

/// Grant as seen by the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermission {
	/// Identifier.
	pub id: String,
	/// Grantee.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// Screen the grant applies to.
	#[serde(rename = "screenId")]
	pub screen_id: String,
	/// Granted screen.
	pub screen: Screen,
	/// Creation timestamp.
	#[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Last update timestamp.
	#[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
}

/// Payload for `POST permission`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermission {
	/// Grantee.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// Screen to grant.
	#[serde(rename = "screenId")]
	pub screen_id: String,
	/// Access level label.
	pub permission: String,
}

/// Answer from `user-permission/check-access`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenAccessCheck {
	/// Whether the signed-in user may open the route.
	#[serde(rename = "canAccess")]
	pub can_access: bool,
	/// Route that was checked.
	pub route: String,
}

/// The signed-in user's grants, used to gate navigation locally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPermissions {
	/// Granted screens.
	pub permissions: Vec<UserPermission>,
	/// Admins may open every screen.
	pub is_admin: bool,
}
impl UserPermissions {
	/// Returns `true` when `route` belongs to an active granted screen, or for admins.
	pub fn can_access(&self, route: &str) -> bool {
		self.is_admin
			|| self.permissions.iter().any(|grant| {
				grant.screen.status == ScreenStatus::Active && grant.screen.route == route
			})
	}
}

resource_handle!(
	/// Permission endpoints.
	Permissions,
	permissions
);
impl<T> Permissions<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET permission`.
	pub async fn all(&self) -> Result<Vec<Permission>> {
		self.session.get("permission").await?.into_result()
	}

	/// `GET permission/user/{id}`.
	pub async fn for_user(&self, user_id: &str) -> Result<Vec<Permission>> {
		self.session.get(&format!("permission/user/{user_id}")).await?.into_result()
	}

	/// `GET permission/screen/{id}`.
	pub async fn for_screen(&self, screen_id: &str) -> Result<Vec<Permission>> {
		self.session.get(&format!("permission/screen/{screen_id}")).await?.into_result()
	}

	/// `GET permission/{id}`.
	pub async fn get(&self, id: &str) -> Result<Permission> {
		self.session.get(&format!("permission/{id}")).await?.into_result()
	}

	/// `POST permission`.
	pub async fn create(&self, grant: &NewPermission) -> Result<Permission> {
		self.session.post("permission", grant).await?.into_result()
	}

	/// `PUT permission/{id}` with a new access level.
	pub async fn update(&self, id: &str, permission: &str) -> Result<Permission> {
		let body = serde_json::json!({ "permission": permission });

		self.session.put(&format!("permission/{id}"), &body).await?.into_result()
	}

	/// `DELETE permission/{id}`.
	pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
		self.session.delete(&format!("permission/{id}")).await?.into_result()
	}

	/// `GET user-permission/my-permissions`.
	pub async fn my_permissions(&self) -> Result<Vec<UserPermission>> {
		self.session.get("user-permission/my-permissions").await?.into_result()
	}

	/// `POST user-permission/check-access`.
	pub async fn check_access(&self, route: &str) -> Result<ScreenAccessCheck> {
		let body = serde_json::json!({ "route": route });

		self.session.post("user-permission/check-access", &body).await?.into_result()
	}
}
