//! Dashboard figures and the recent activity feed.

// self
use crate::{_prelude::*, api::resource_handle, http::HttpTransport, session::ApiCall};

/// Area of the business an activity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
	/// Listing changes.
	Property,
	/// Tenant onboarding and updates.
	Tenant,
	/// Rent received or paid out.
	Payment,
	/// Account and housekeeping events.
	System,
}

/// One entry of the activity feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
	/// Identifier.
	pub id: String,
	/// Area of the business.
	#[serde(rename = "type")]
	pub kind: ActivityKind,
	/// Short verb phrase, e.g. `created`.
	pub action: String,
	/// Human-readable summary.
	pub description: String,
	/// Timestamp as sent by the backend.
	pub timestamp: String,
	/// Acting user.
	#[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Acting user's display name.
	#[serde(default, rename = "userName", skip_serializing_if = "Option::is_none")]
	pub user_name: Option<String>,
	/// Free-form context.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<JsonValue>,
}

/// Headline figures for the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
	/// Properties on the books.
	pub total_properties: u64,
	/// Properties with a published listing.
	pub published_properties: u64,
	/// Properties still in draft.
	pub draft_properties: u64,
	/// Tenants on the books.
	pub total_tenants: u64,
	/// Tenants with a live tenancy.
	pub active_tenants: u64,
	/// Rent collected this month.
	pub monthly_revenue: f64,
	/// Let share of the portfolio, in percent.
	pub occupancy_rate: f64,
	/// Activities the backend bundles with the figures.
	pub recent_activities: Vec<Activity>,
}
impl DashboardStats {
	/// Overwrites the figures present in `update`.
	pub fn merge(&mut self, update: StatsUpdate) {
		macro_rules! take {
			($($field:ident),*) => {
				$(if let Some(value) = update.$field {
					self.$field = value;
				})*
			};
		}

		take!(
			total_properties,
			published_properties,
			draft_properties,
			total_tenants,
			active_tenants,
			monthly_revenue,
			occupancy_rate,
			recent_activities
		);
	}
}

/// Partial [`DashboardStats`] pushed by live updates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsUpdate {
	/// See [`DashboardStats::total_properties`].
	pub total_properties: Option<u64>,
	/// See [`DashboardStats::published_properties`].
	pub published_properties: Option<u64>,
	/// See [`DashboardStats::draft_properties`].
	pub draft_properties: Option<u64>,
	/// See [`DashboardStats::total_tenants`].
	pub total_tenants: Option<u64>,
	/// See [`DashboardStats::active_tenants`].
	pub active_tenants: Option<u64>,
	/// See [`DashboardStats::monthly_revenue`].
	pub monthly_revenue: Option<f64>,
	/// See [`DashboardStats::occupancy_rate`].
	pub occupancy_rate: Option<f64>,
	/// See [`DashboardStats::recent_activities`].
	pub recent_activities: Option<Vec<Activity>>,
}

/// Newest-first activity list kept on the client, capped at [`ActivityFeed::CAPACITY`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityFeed {
	entries: VecDeque<Activity>,
}
impl ActivityFeed {
	/// Maximum number of entries kept.
	pub const CAPACITY: usize = 50;

	/// Replaces the feed with `activities` (already newest first), keeping the first
	/// [`Self::CAPACITY`].
	pub fn replace(&mut self, activities: Vec<Activity>) {
		self.entries = activities.into_iter().take(Self::CAPACITY).collect();
	}

	/// Adds `activity` at the top, dropping the oldest entry when full.
	pub fn push(&mut self, activity: Activity) {
		self.entries.push_front(activity);
		self.entries.truncate(Self::CAPACITY);
	}

	/// Entries, newest first.
	pub fn iter(&self) -> impl Iterator<Item = &Activity> {
		self.entries.iter()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when the feed is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActivityList {
	List(Vec<Activity>),
	Other(#[allow(dead_code)] JsonValue),
}

resource_handle!(
	/// Dashboard endpoints.
	Dashboard,
	dashboard
);
impl<T> Dashboard<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// Default number of activities requested.
	pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

	/// `GET dashboard/stats`; an empty body yields zeroed figures.
	pub async fn stats(&self) -> Result<DashboardStats> {
		let stats: Option<DashboardStats> = self.session.get("dashboard/stats").await?.into_result()?;

		Ok(stats.unwrap_or_default())
	}

	/// `GET dashboard/activities?limit=`; a body that is not a list yields no activities.
	pub async fn activities(&self, limit: Option<u32>) -> Result<Vec<Activity>> {
		let call = ApiCall::get("dashboard/activities")
			.query("limit", limit.unwrap_or(Self::DEFAULT_ACTIVITY_LIMIT));
		let list: Option<ActivityList> = self.session.request(call).await?.into_result()?;

		Ok(match list {
			Some(ActivityList::List(activities)) => activities,
			_ => Vec::new(),
		})
	}
}
