//! Tenants.

// self
use crate::{
	_prelude::*,
	api::{MessageResponse, PAGE_SIZE, Page, resource_handle},
	http::HttpTransport,
	session::ApiCall,
};

/// Tenant record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
	/// Identifier.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Contact name.
	#[serde(default)]
	pub name: String,
	/// Contact email.
	#[serde(default)]
	pub email: String,
	/// Contact phone.
	#[serde(default)]
	pub phone: String,
	/// Employer or company.
	#[serde(default)]
	pub company: String,
	/// Unmodelled fields.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

resource_handle!(
	/// Tenant endpoints.
	Tenants,
	tenants
);
impl<T> Tenants<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET tenant/tenants?page=&limit=10&search=`.
	pub async fn list(&self, page: u32, search: &str) -> Result<Page<Tenant>> {
		let call = ApiCall::get("tenant/tenants")
			.query("page", page.max(1))
			.query("limit", PAGE_SIZE)
			.query("search", search);

		self.session.request(call).await?.into_result()
	}

	/// `DELETE tenant/delete/{id}`.
	pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
		self.session.delete(&format!("tenant/delete/{id}")).await?.into_result()
	}
}
