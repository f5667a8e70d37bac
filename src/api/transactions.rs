//! Rent collection and landlord payout ledger for a property.

// self
use crate::{_prelude::*, api::resource_handle, http::HttpTransport, session::ApiCall};

/// Ledger entry for one property.
///
/// Only the keys every entry carries are modelled; the tenant, landlord, and profit sections
/// (`fromTenant*`, `toLandlord*`, `landlordNet*`, `grossProfit`) live in [`Transaction::sections`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	/// Owning property.
	#[serde(rename = "propertyId")]
	pub property_id: String,
	/// Branch that handled the payment.
	#[serde(default, rename = "Branch")]
	pub branch: String,
	/// Section fields keyed by their wire names.
	#[serde(flatten)]
	pub sections: serde_json::Map<String, JsonValue>,
}
impl Transaction {
	/// Creates an empty entry for `property_id`.
	pub fn new(property_id: impl Into<String>, branch: impl Into<String>) -> Self {
		Self { property_id: property_id.into(), branch: branch.into(), sections: Default::default() }
	}

	/// Sets a section field.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.sections.insert(key.into(), value.into());

		self
	}

	/// Reads a numeric section field such as `tenantNetOutstanding`.
	pub fn amount(&self, key: &str) -> Option<f64> {
		match self.sections.get(key)? {
			JsonValue::Number(number) => number.as_f64(),
			JsonValue::String(text) => text.trim().parse().ok(),
			_ => None,
		}
	}
}

/// Body of `GET manager/getTransaction`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionLookup {
	/// Stored entry, when one exists.
	#[serde(default, rename = "transactionData")]
	pub transaction_data: Option<Transaction>,
}

resource_handle!(
	/// Transaction endpoints.
	Transactions,
	transactions
);
impl<T> Transactions<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET manager/getTransaction?propertyId=`.
	pub async fn for_property(&self, property_id: &str) -> Result<Option<Transaction>> {
		let call = ApiCall::get("manager/getTransaction").query("propertyId", property_id);
		let lookup: Option<TransactionLookup> = self.session.request(call).await?.into_result()?;

		Ok(lookup.and_then(|lookup| lookup.transaction_data))
	}

	/// `POST transaction`.
	pub async fn create(&self, transaction: &Transaction) -> Result<JsonValue> {
		self.session.post("transaction", transaction).await?.into_result()
	}

	/// `POST manager/transaction`, creating or replacing the property's entry.
	pub async fn upsert(&self, transaction: &Transaction) -> Result<JsonValue> {
		self.session.post("manager/transaction", transaction).await?.into_result()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn section_fields_flatten_onto_the_entry() {
		let entry = Transaction::new("p-9", "Headingley")
			.with("fromTenantRentReceived", 950)
			.with("toLandlordChequeNo", "000123");
		let encoded = serde_json::to_value(&entry).expect("Transaction should encode.");

		assert_eq!(encoded["propertyId"], "p-9");
		assert_eq!(encoded["Branch"], "Headingley");
		assert_eq!(encoded["fromTenantRentReceived"], 950);
		assert_eq!(entry.amount("fromTenantRentReceived"), Some(950.0));
		assert_eq!(entry.amount("toLandlordChequeNo"), Some(123.0));
		assert_eq!(entry.amount("grossProfit"), None);
	}
}
