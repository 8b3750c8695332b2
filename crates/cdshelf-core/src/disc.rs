use crate::ids::AccountId;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One catalog item.
///
/// Field names on the wire follow the upstream bulk payload, so a cached
/// or served listing is the upstream shape verbatim. The camelCase names
/// are accepted as aliases when reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscRecord {
    /// Upstream opaque identifier.
    pub id: String,
    /// Display name, empty when it could not be recovered.
    #[serde(default)]
    pub title: String,
    /// Cover image URL. Empty means "no image".
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub label: String,
    /// Label identifier, `0` when unknown.
    #[serde(rename = "labelid", alias = "labelId", default)]
    pub label_id: u64,
    #[serde(rename = "labelcover", alias = "labelCover", default)]
    pub label_cover: String,
    /// Optional ranking signal. `None` is "not applicable", not zero.
    #[serde(default)]
    pub boost: Option<f64>,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "onlyhavegift", alias = "onlyHasGift", default)]
    pub only_has_gift: bool,
    /// Overrides the canonical upstream link when present.
    #[serde(
        rename = "promolink",
        alias = "promoLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub promo_link: Option<String>,
}

impl DiscRecord {
    /// Returns the link a reader should follow for this disc: the promo
    /// link when set, otherwise the canonical detail page under `base_url`.
    pub fn link(&self, base_url: &str) -> String {
        match &self.promo_link {
            Some(link) => link.clone(),
            None => format!("{}/d/{}/", base_url.trim_end_matches('/'), self.id),
        }
    }
}

/// A cached disc listing for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub account_id: AccountId,
    /// Discs in upstream order.
    pub discs: Vec<DiscRecord>,
    pub fetched_at: Timestamp,
    pub ttl_seconds: u64,
}

impl CollectionEntry {
    /// Creates an entry fetched now.
    pub fn new(account_id: AccountId, discs: Vec<DiscRecord>, ttl: Duration) -> Self {
        Self {
            account_id,
            discs,
            fetched_at: Timestamp::now(),
            ttl_seconds: ttl.as_secs(),
        }
    }

    /// The instant after which the entry is logically absent.
    pub fn expires_at(&self) -> Timestamp {
        let secs = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        self.fetched_at
            .checked_add(SignedDuration::from_secs(secs))
            .unwrap_or(Timestamp::MAX)
    }

    pub fn into_discs(self) -> Vec<DiscRecord> {
        self.discs
    }
}
