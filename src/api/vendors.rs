//! Vendors (landlords) the agency lets on behalf of.

// self
use crate::{
	_prelude::*,
	api::{MessageResponse, PAGE_SIZE, Page, resource_handle},
	http::HttpTransport,
	session::ApiCall,
};

/// Vendor record.
///
/// Fields the back office does not model are kept in [`Vendor::extra`] so an update round-trips
/// them unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
	/// Identifier; empty for a vendor that has not been created yet.
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
	/// Company name.
	#[serde(default)]
	pub company: String,
	/// Unmodelled fields.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}

resource_handle!(
	/// Vendor endpoints.
	Vendors,
	vendors
);
impl<T> Vendors<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET vendor/getVendors?page=&limit=10&search=`.
	pub async fn list(&self, page: u32, search: &str) -> Result<Page<Vendor>> {
		let call = ApiCall::get("vendor/getVendors")
			.query("page", page.max(1))
			.query("limit", PAGE_SIZE)
			.query("search", search);

		self.session.request(call).await?.into_result()
	}

	/// `GET vendor/getVendorById/{id}`.
	pub async fn get(&self, id: &str) -> Result<Vendor> {
		self.session.get(&format!("vendor/getVendorById/{id}")).await?.into_result()
	}

	/// `POST vendor/create`.
	pub async fn create(&self, vendor: &Vendor) -> Result<Vendor> {
		self.session.post("vendor/create", vendor).await?.into_result()
	}

	/// `POST vendor/update`; the vendor's `id` selects the record.
	pub async fn update(&self, vendor: &Vendor) -> Result<Vendor> {
		self.session.post("vendor/update", vendor).await?.into_result()
	}

	/// `DELETE vendor/delete/{id}`.
	pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
		self.session.delete(&format!("vendor/delete/{id}")).await?.into_result()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_fields_round_trip() {
		let raw = r#"{"id":"v-1","name":"Hill Estates","email":"a@b.c","phone":"0113","company":"Hill","vatNumber":"GB1"}"#;
		let vendor: Vendor = serde_json::from_str(raw).expect("Vendor should decode.");

		assert_eq!(vendor.extra.get("vatNumber"), Some(&JsonValue::from("GB1")));

		let encoded = serde_json::to_value(&vendor).expect("Vendor should encode.");

		assert_eq!(encoded["vatNumber"], "GB1");
	}

	#[test]
	fn new_vendor_omits_id() {
		let vendor = Vendor { name: "Hill Estates".into(), ..Default::default() };
		let encoded = serde_json::to_value(&vendor).expect("Vendor should encode.");

		assert!(encoded.get("id").is_none());
	}
}
