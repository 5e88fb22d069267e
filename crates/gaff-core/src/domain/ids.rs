//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID
//! Search と Attempt の ID は ULID で表現します。
//! `Id<T>` は Phantom type で、マーカー型ごとに別の型になります。
//!
//! - 時刻でソート可能（レポート上で attempt の順序がそのまま読める）
//! - `SearchId` と `AttemptId` はコンパイル時に混同できない

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"search-", "attempt-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Search のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Search {}

impl IdMarker for Search {
    fn prefix() -> &'static str {
        "search-"
    }
}

/// Attempt のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attempt {}

impl IdMarker for Attempt {
    fn prefix() -> &'static str {
        "attempt-"
    }
}

/// Identifier of one gaff search (one call to `GaffSearch::run`).
pub type SearchId = Id<Search>;

/// Identifier of one search attempt (restarted from step 0 on `Fail`).
pub type AttemptId = Id<Attempt>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let ulid1 = Ulid::new();
        let ulid2 = Ulid::new();

        let search = SearchId::from_ulid(ulid1);
        let attempt = AttemptId::from_ulid(ulid2);

        assert_eq!(search.as_ulid(), ulid1);
        assert_eq!(attempt.as_ulid(), ulid2);

        assert!(search.to_string().starts_with("search-"));
        assert!(attempt.to_string().starts_with("attempt-"));
        // let _: SearchId = attempt; // <- does not compile
    }

    #[test]
    fn ulid_ids_can_be_serialized() {
        let attempt_id = AttemptId::from_ulid(Ulid::new());

        let serialized = serde_json::to_string(&attempt_id).unwrap();
        let deserialized: AttemptId = serde_json::from_str(&serialized).unwrap();

        assert_eq!(attempt_id, deserialized);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<SearchId>(), size_of::<Ulid>());
        assert_eq!(size_of::<AttemptId>(), 16);
    }
}
