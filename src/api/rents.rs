//! Rent and tenancy terms for a managed property.

// self
use crate::{_prelude::*, api::resource_handle, http::HttpTransport, session::ApiCall};

/// Rent terms, one record per managed property.
///
/// Field names follow the backend's column names, capitalization included.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rent {
	/// Identifier; empty before the first upsert.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Owning property.
	#[serde(rename = "propertyId")]
	pub property_id: String,
	/// Monthly rent as entered.
	#[serde(default, rename = "Amount")]
	pub amount: String,
	/// Date the deposit was received.
	#[serde(default, rename = "ReceivedOn")]
	pub received_on: String,
	/// Deposit holder.
	#[serde(default, rename = "HoldBy")]
	pub hold_by: String,
	/// Date the deposit was returned.
	#[serde(default, rename = "ReturnedOn")]
	pub returned_on: String,
	/// Agreement date.
	#[serde(default, rename = "DateOfAgreement")]
	pub date_of_agreement: String,
	/// Deposit amount; the backend accepts numbers and strings.
	#[serde(default, rename = "Deposit")]
	pub deposit: JsonValue,
	/// Number of occupants.
	#[serde(default, rename = "NoOfOccupant")]
	pub no_of_occupant: u32,
	/// DSS reference.
	#[serde(default, rename = "DssRef")]
	pub dss_ref: String,
	/// Furnishing level.
	#[serde(default, rename = "HowFurnished")]
	pub how_furnished: String,
	/// Free-text note.
	#[serde(default, rename = "Note")]
	pub note: String,
	/// Reference carried over from the previous system.
	#[serde(default, rename = "oldRef")]
	pub old_ref: String,
	/// Fee description.
	#[serde(default)]
	pub fees: String,
	/// Whether the tenancy is closed.
	#[serde(default)]
	pub closed: bool,
	/// Fee amount as typed.
	#[serde(default)]
	pub fees_input: String,
	/// Fee basis selected from the dropdown.
	#[serde(default)]
	pub fees_select: String,
}

/// Body of `GET property-management/rent`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RentLookup {
	/// Rent record, when one exists.
	#[serde(default)]
	pub rents: Option<Rent>,
	/// Page count reported alongside the record.
	#[serde(default, rename = "totalPages")]
	pub total_pages: Option<u32>,
}

resource_handle!(
	/// Rent endpoints.
	Rents,
	rents
);
impl<T> Rents<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET property-management/rent?propertyId=`.
	pub async fn for_property(&self, property_id: &str) -> Result<Option<Rent>> {
		let call = ApiCall::get("property-management/rent").query("propertyId", property_id);
		let lookup: Option<RentLookup> = self.session.request(call).await?.into_result()?;

		Ok(lookup.and_then(|lookup| lookup.rents))
	}

	/// `POST property-management/rent/upsert`.
	pub async fn upsert(&self, rent: &Rent) -> Result<JsonValue> {
		self.session.post("property-management/rent/upsert", rent).await?.into_result()
	}
}
