//! Let properties and their listing filters.

// self
use crate::{
	_prelude::*,
	api::{MessageResponse, PAGE_SIZE, Page, resource_handle},
	http::{FilePart, HttpTransport, MultipartPayload},
	session::ApiCall,
};

/// Property record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
	/// Identifier; empty before creation.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Display name.
	#[serde(default, rename = "propertyName")]
	pub property_name: String,
	/// First address line.
	#[serde(default, rename = "addressLine1")]
	pub address_line1: String,
	/// Town.
	#[serde(default)]
	pub town: String,
	/// Category such as `residential` or `commercial`.
	#[serde(default)]
	pub category: String,
	/// Listing status such as `published` or `draft`.
	#[serde(default)]
	pub status: String,
	/// Asking rent, as entered.
	#[serde(default)]
	pub price: JsonValue,
	/// Unmodelled fields.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

/// Filters for the property list; blank filters are left out of the query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
	/// One-based page.
	pub page: u32,
	/// Rows per page.
	pub limit: u32,
	/// Free-text search.
	pub search: String,
	/// Category filter.
	pub category: Option<String>,
	/// Status filter.
	pub status: Option<String>,
	/// Postcode filter.
	pub post_code: Option<String>,
	/// Country filter.
	pub country: Option<String>,
}
impl PropertyFilter {
	/// Filter for page `page` with no other constraints.
	pub fn page(page: u32) -> Self {
		Self { page, ..Default::default() }
	}

	/// Sets the free-text search.
	pub fn search(mut self, search: impl Into<String>) -> Self {
		self.search = search.into();

		self
	}

	/// Sets the category filter.
	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());

		self
	}

	/// Sets the status filter.
	pub fn status(mut self, status: impl Into<String>) -> Self {
		self.status = Some(status.into());

		self
	}

	/// Sets the postcode filter.
	pub fn post_code(mut self, post_code: impl Into<String>) -> Self {
		self.post_code = Some(post_code.into());

		self
	}

	/// Sets the country filter.
	pub fn country(mut self, country: impl Into<String>) -> Self {
		self.country = Some(country.into());

		self
	}

	fn apply(&self, call: ApiCall) -> ApiCall {
		call.query("page", self.page.max(1))
			.query("limit", if self.limit == 0 { PAGE_SIZE } else { self.limit })
			.query("search", &self.search)
			.query_opt("category", self.category.as_deref())
			.query_opt("status", self.status.as_deref())
			.query_opt("postCode", self.post_code.as_deref())
			.query_opt("country", self.country.as_deref())
	}
}
impl Default for PropertyFilter {
	fn default() -> Self {
		Self {
			page: 1,
			limit: PAGE_SIZE,
			search: String::new(),
			category: None,
			status: None,
			post_code: None,
			country: None,
		}
	}
}

resource_handle!(
	/// Property endpoints.
	Properties,
	properties
);
impl<T> Properties<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET properties` with `filter` applied.
	pub async fn list(&self, filter: &PropertyFilter) -> Result<Page<Property>> {
		self.session.request(filter.apply(ApiCall::get("properties"))).await?.into_result()
	}

	/// `POST properties` as JSON.
	pub async fn create(&self, property: &Property) -> Result<Property> {
		self.session.post("properties", property).await?.into_result()
	}

	/// `POST properties` as multipart, attaching `files` (photos, certificates).
	pub async fn create_with_files(&self, property: &Property, files: Vec<FilePart>) -> Result<Property> {
		let mut payload = MultipartPayload { fields: form_fields(property)?, files: Vec::new() };

		for file in files {
			payload = payload.part(file);
		}

		self.session.post_multipart("properties", payload).await?.into_result()
	}

	/// `POST property/update`; the property's `id` selects the record.
	pub async fn update(&self, property: &Property) -> Result<Property> {
		self.session.post("property/update", property).await?.into_result()
	}

	/// `DELETE properties/{id}`.
	pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
		self.session.delete(&format!("properties/{id}")).await?.into_result()
	}
}

/// Flattens a record into form fields: strings as-is, `null` skipped, everything else as JSON.
fn form_fields<V>(value: &V) -> Result<Vec<(String, String)>>
where
	V: Serialize,
{
	let JsonValue::Object(map) = serde_json::to_value(value).map_err(Error::Encode)? else {
		return Ok(Vec::new());
	};

	Ok(map
		.into_iter()
		.filter_map(|(key, value)| match value {
			JsonValue::Null => None,
			JsonValue::String(text) => Some((key, text)),
			other => Some((key, other.to_string())),
		})
		.collect())
}
