//! Staff accounts.

// self
use crate::{
	_prelude::*,
	api::{MessageResponse, resource_handle},
	http::HttpTransport,
};

/// Account role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
	/// Full access, including user and permission management.
	Admin,
	/// Access limited to granted screens.
	#[default]
	User,
}

/// Staff account as returned by `user/*`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Identifier.
	pub id: String,
	/// Login email.
	pub email: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Role.
	#[serde(default)]
	pub role: Role,
	/// Title such as Mr or Dr.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub salutation: Option<String>,
	/// Postal code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post_code: Option<String>,
	/// Street address.
	#[serde(default, rename = "Address", skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Town.
	#[serde(default, rename = "Town", skip_serializing_if = "Option::is_none")]
	pub town: Option<String>,
	/// Country.
	#[serde(default, rename = "Country", skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,
	/// Stored as a number by some records and as a string by others.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<JsonValue>,
	/// Fax number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fax: Option<String>,
	/// Date of birth as sent by the backend.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date_of_birth: Option<String>,
	/// Personal or company website.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<String>,
	/// Pager number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pager: Option<String>,
	/// Place of birth.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub birth_place: Option<String>,
	/// Nationality.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nationality: Option<String>,
	/// Passport number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub passport: Option<String>,
	/// Whether the account accepts LHA/DWP tenants (the backend spells the key `accpet_LHA_DWP`).
	#[serde(default, rename = "accpet_LHA_DWP", skip_serializing_if = "Option::is_none")]
	pub accept_lha_dwp: Option<String>,
	/// Free-text notes visible to staff only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internal_info: Option<String>,
	/// Creation timestamp.
	#[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Last update timestamp.
	#[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
}
impl User {
	/// `first last`, trimmed.
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name).trim().to_owned()
	}

	/// Returns `true` for [`Role::Admin`].
	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}
}

/// Payload for `auth/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUser {
	/// Login email.
	pub email: String,
	/// Initial password.
	pub password: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Contact number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<u64>,
	/// Role.
	pub role: Role,
}
impl Debug for CreateUser {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CreateUser")
			.field("email", &self.email)
			.field("first_name", &self.first_name)
			.field("last_name", &self.last_name)
			.field("role", &self.role)
			.finish_non_exhaustive()
	}
}

/// Partial update for `user/{id}`; absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUser {
	/// Given name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Contact number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<u64>,
	/// Role.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<Role>,
}

resource_handle!(
	/// Staff account endpoints (admin only, except [`Users::me`]).
	Users,
	users
);
impl<T> Users<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET user/me`.
	pub async fn me(&self) -> Result<User> {
		self.session.get("user/me").await?.into_result()
	}

	/// `GET user/all`.
	pub async fn all(&self) -> Result<Vec<User>> {
		self.session.get("user/all").await?.into_result()
	}

	/// `GET user/{id}`.
	pub async fn get(&self, id: &str) -> Result<User> {
		self.session.get(&format!("user/{id}")).await?.into_result()
	}

	/// Registers a new account through `auth/register`.
	pub async fn create(&self, user: &CreateUser) -> Result<User> {
		self.session.post("auth/register", user).await?.into_result()
	}

	/// `PUT user/{id}`.
	pub async fn update(&self, id: &str, changes: &UpdateUser) -> Result<User> {
		self.session.put(&format!("user/{id}"), changes).await?.into_result()
	}

	/// `DELETE user/{id}`.
	pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
		self.session.delete(&format!("user/{id}")).await?.into_result()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_backend_spellings() {
		let user: User = serde_json::from_str(
			r#"{
				"id": "u-7",
				"email": "lettings@example.com",
				"first_name": "Priya",
				"last_name": "Shah ",
				"role": "User",
				"Town": "Leeds",
				"phone_number": 7700900123,
				"accpet_LHA_DWP": "yes"
			}"#,
		)
		.expect("User should decode.");

		assert_eq!(user.town.as_deref(), Some("Leeds"));
		assert_eq!(user.accept_lha_dwp.as_deref(), Some("yes"));
		assert_eq!(user.phone_number, Some(JsonValue::from(7_700_900_123_u64)));
		assert_eq!(user.full_name(), "Priya Shah");
		assert!(!user.is_admin());
	}

	#[test]
	fn update_skips_absent_fields() {
		let changes = UpdateUser { role: Some(Role::Admin), ..Default::default() };

		assert_eq!(serde_json::to_string(&changes).expect("Update should encode."), r#"{"role":"Admin"}"#);
	}
}
