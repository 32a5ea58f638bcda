//! Data models for movie collections.
//!
//! This module defines the payload and status types that flow from the
//! collections repository into the library state.

use serde::{Deserialize, Serialize};

use crate::error::domain::FailureKind;

/// Represents a movie as supplied by the collections repository.
///
/// The library state treats this as an opaque payload and never reads its
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Movie {
    /// Remote movie ID.
    pub id: i64,
    /// Movie title.
    pub title: String,
    /// Short plot summary (if available).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster image path (if available).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Release date as reported upstream (if available).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Movie {
    /// Creates a movie with only an ID and title.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Selects which account collection a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionType {
    /// Movies marked as favourite.
    Favourite,
    /// Movies added to the watchlist.
    Watchlist,
}

/// Current known status of a collection fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionResult<T> {
    /// A fetch is in flight and no fresh data is available yet.
    Loading,
    /// The collection contents, in repository order.
    Success(Vec<T>),
    /// The repository reported a failure of the given class.
    Failure(FailureKind),
}

impl<T> CollectionResult<T> {
    /// Returns the payload if this is a `Success`.
    pub fn data(&self) -> Option<&[T]> {
        match self {
            Self::Success(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_str, to_string};

    use crate::{
        error::domain::FailureKind,
        library::models::{CollectionResult, CollectionType, Movie},
    };

    #[test]
    fn test_movie_skips_missing_optionals() {
        let movie = Movie::new(550, "Fight Club");
        let json = to_string(&movie).unwrap();
        assert_eq!(json, r#"{"id":550,"title":"Fight Club"}"#);
    }

    #[test]
    fn test_movie_deserialization_with_optionals() {
        let json = r#"{"id":13,"title":"Forrest Gump","release_date":"1994-07-06"}"#;
        let movie: Movie = from_str(json).unwrap();
        assert_eq!(movie.id, 13);
        assert_eq!(movie.release_date.as_deref(), Some("1994-07-06"));
        assert!(movie.overview.is_none());
    }

    #[test]
    fn test_collection_result_accessors() {
        let success = CollectionResult::Success(vec![Movie::new(1, "A")]);
        assert_eq!(success.data().map(<[Movie]>::len), Some(1));
        assert!(!success.is_loading());

        let loading: CollectionResult<Movie> = CollectionResult::Loading;
        assert!(loading.data().is_none());
        assert!(loading.is_loading());

        let failure: CollectionResult<Movie> = CollectionResult::Failure(FailureKind::Timeout);
        assert!(failure.data().is_none());
    }

    #[test]
    fn test_collection_type_debug() {
        assert_eq!(format!("{:?}", CollectionType::Favourite), "Favourite");
        assert_eq!(format!("{:?}", CollectionType::Watchlist), "Watchlist");
    }
}
