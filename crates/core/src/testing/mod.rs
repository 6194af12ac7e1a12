//! Testing utilities and mock implementations.
//!
//! Mocks of the catalog reader and of key/value storage, so the watchlist and
//! the HTTP surface can be exercised without network access or a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use reel_core::testing::{fixtures, MockCatalogReader};
//!
//! let catalog = MockCatalogReader::new();
//! catalog
//!     .set_popular_movies(fixtures::page(1, vec![fixtures::inception()]))
//!     .await;
//! ```

mod flaky_storage;
mod mock_catalog;

pub use flaky_storage::FlakyStorage;
pub use mock_catalog::{MockCatalogReader, RecordedCatalogQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{
        CastMember, CatalogItem, CatalogPage, Credits, Episode, MovieDetails, Season,
        SeasonSummary, ShowDetails, Video,
    };

    /// A movie listing entry as the remote API returns it.
    pub fn movie(id: i64, title: &str) -> CatalogItem {
        CatalogItem::new(id)
            .with_field("title", title)
            .with_field("overview", format!("A movie about {}.", title.to_lowercase()))
            .with_field("poster_path", "/poster.jpg")
            .with_field("release_date", "2010-07-15")
            .with_field("vote_average", 7.5)
    }

    /// A TV listing entry as the remote API returns it.
    pub fn show(id: i64, name: &str) -> CatalogItem {
        CatalogItem::new(id)
            .with_field("name", name)
            .with_field("overview", format!("A show about {}.", name.to_lowercase()))
            .with_field("poster_path", "/poster.jpg")
            .with_field("first_air_date", "2008-01-20")
            .with_field("vote_average", 8.9)
    }

    pub fn inception() -> CatalogItem {
        CatalogItem::new(27205)
            .with_field("title", "Inception")
            .with_field("poster_path", "/inception.jpg")
            .with_field("release_date", "2010-07-15")
            .with_field("vote_average", 8.4)
    }

    pub fn interstellar() -> CatalogItem {
        CatalogItem::new(157336)
            .with_field("title", "Interstellar")
            .with_field("poster_path", "/interstellar.jpg")
            .with_field("release_date", "2014-11-05")
            .with_field("vote_average", 8.4)
    }

    /// A listing page holding `results`, reported as the only page.
    pub fn page(number: u32, results: Vec<CatalogItem>) -> CatalogPage {
        CatalogPage {
            page: number,
            total_pages: number.max(1),
            total_results: results.len() as u32,
            results,
        }
    }

    /// Movie details with reasonable defaults.
    pub fn movie_details(id: u32, title: &str) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            original_title: None,
            original_language: Some("en".to_string()),
            tagline: None,
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            release_date: Some("2010-07-15".to_string()),
            runtime_minutes: Some(148),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            genres: vec!["Science Fiction".to_string(), "Action".to_string()],
            vote_average: Some(8.4),
            vote_count: 35000,
        }
    }

    /// Show details with `seasons` season summaries. Season names and air
    /// dates are left empty so display defaults are visible.
    pub fn show_details(id: u32, name: &str, seasons: u32) -> ShowDetails {
        ShowDetails {
            id,
            name: name.to_string(),
            original_name: None,
            original_language: Some("en".to_string()),
            overview: Some(format!("A show about {}.", name.to_lowercase())),
            first_air_date: Some("2008-01-20".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            number_of_seasons: seasons,
            number_of_episodes: seasons * 10,
            seasons: (1..=seasons)
                .map(|s| SeasonSummary {
                    season_number: s,
                    name: None,
                    episode_count: 10,
                    air_date: None,
                    poster_path: None,
                })
                .collect(),
            genres: vec!["Drama".to_string()],
            vote_average: Some(8.9),
        }
    }

    /// A season with `episodes` episodes.
    pub fn season(season_number: u32, episodes: u32) -> Season {
        Season {
            season_number,
            name: Some(format!("Season {}", season_number)),
            overview: None,
            air_date: Some("2008-01-20".to_string()),
            poster_path: None,
            episodes: (1..=episodes)
                .map(|e| Episode {
                    episode_number: e,
                    name: format!("Episode {}", e),
                    overview: None,
                    runtime_minutes: Some(47),
                    air_date: None,
                    still_path: None,
                    vote_average: Some(8.0),
                })
                .collect(),
        }
    }

    /// Credits with `n` cast members in billing order.
    pub fn credits(n: u32) -> Credits {
        Credits {
            cast: (0..n)
                .map(|i| CastMember {
                    id: 1000 + i,
                    name: format!("Actor {}", i),
                    character: Some(format!("Character {}", i)),
                    profile_path: None,
                    order: i,
                })
                .collect(),
        }
    }

    /// A YouTube video of the given type ("Trailer", "Teaser", ...).
    pub fn youtube_video(key: &str, video_type: &str) -> Video {
        Video {
            key: key.to_string(),
            name: format!("Official {}", video_type),
            site: "YouTube".to_string(),
            video_type: video_type.to_string(),
            official: true,
        }
    }
}
