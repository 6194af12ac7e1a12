//! Helpers the views apply to catalog data before showing it.

use std::collections::HashSet;

use super::item::CatalogItem;
use super::types::{CastMember, Credits, SeasonSummary, ShowDetails, Video};

/// Keep items whose title contains `term`, ignoring case.
///
/// Movies match on `title`, shows on `name`. A blank term keeps everything.
/// Items without any title never match a non-blank term.
pub fn filter_by_title(items: Vec<CatalogItem>, term: &str) -> Vec<CatalogItem> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| {
            item.title()
                .map(|title| title.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect()
}

/// Drop items whose id was already seen, keeping the first occurrence.
pub fn dedup_by_id(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

/// First YouTube trailer, if any.
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
}

/// First `n` billed cast members.
pub fn top_cast(credits: Credits, n: usize) -> Vec<CastMember> {
    let mut cast = credits.cast;
    cast.truncate(n);
    cast
}

/// Season summaries with display defaults filled in from the show.
///
/// Empty strings count as missing, TMDB sends `""` for unknown air dates.
pub fn normalize_seasons(show: &ShowDetails) -> Vec<SeasonSummary> {
    show.seasons
        .iter()
        .map(|season| SeasonSummary {
            season_number: season.season_number,
            name: non_empty(&season.name)
                .or_else(|| Some(format!("Season {}", season.season_number))),
            episode_count: season.episode_count,
            air_date: non_empty(&season.air_date).or_else(|| non_empty(&show.first_air_date)),
            poster_path: non_empty(&season.poster_path).or_else(|| non_empty(&show.poster_path)),
        })
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.trim().is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemId;

    fn movie(id: i64, title: &str) -> CatalogItem {
        CatalogItem::new(id).with_field("title", title)
    }

    fn video(key: &str, site: &str, video_type: &str) -> Video {
        Video {
            key: key.to_string(),
            name: String::new(),
            site: site.to_string(),
            video_type: video_type.to_string(),
            official: true,
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let items = vec![
            movie(1, "Inception"),
            movie(2, "Interstellar"),
            movie(3, "The Prestige"),
        ];
        let filtered = filter_by_title(items, "INTER");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, ItemId::Number(2));
    }

    #[test]
    fn test_filter_blank_term_keeps_all_in_order() {
        let items = vec![movie(2, "B"), movie(1, "A")];
        let filtered = filter_by_title(items, "   ");
        let ids: Vec<_> = filtered.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![ItemId::Number(2), ItemId::Number(1)]);
    }

    #[test]
    fn test_filter_matches_show_names() {
        let items = vec![
            CatalogItem::new(1396).with_field("name", "Breaking Bad"),
            CatalogItem::new(7),
        ];
        let filtered = filter_by_title(items, "bad");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, ItemId::Number(1396));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let items = vec![
            movie(1, "first"),
            movie(2, "other"),
            movie(1, "second copy"),
        ];
        let deduped = dedup_by_id(items);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title(), Some("first"));
        assert_eq!(deduped[1].id, ItemId::Number(2));
    }

    #[test]
    fn test_pick_trailer_requires_youtube_trailer() {
        let videos = vec![
            video("teaser", "YouTube", "Teaser"),
            video("vimeo", "Vimeo", "Trailer"),
            video("yt1", "YouTube", "Trailer"),
            video("yt2", "YouTube", "Trailer"),
        ];
        assert_eq!(pick_trailer(&videos).map(|v| v.key.as_str()), Some("yt1"));
        assert!(pick_trailer(&videos[..2]).is_none());
    }

    #[test]
    fn test_top_cast_truncates() {
        let credits = Credits {
            cast: (0..15)
                .map(|i| CastMember {
                    id: i,
                    name: format!("Actor {}", i),
                    character: None,
                    profile_path: None,
                    order: i,
                })
                .collect(),
        };
        let cast = top_cast(credits, 10);
        assert_eq!(cast.len(), 10);
        assert_eq!(cast[9].name, "Actor 9");
    }

    fn breaking_bad() -> ShowDetails {
        ShowDetails {
            id: 1396,
            name: "Breaking Bad".to_string(),
            original_name: None,
            original_language: None,
            overview: None,
            first_air_date: Some("2008-01-20".to_string()),
            poster_path: Some("/show.jpg".to_string()),
            backdrop_path: None,
            number_of_seasons: 2,
            number_of_episodes: 20,
            seasons: vec![
                SeasonSummary {
                    season_number: 1,
                    name: None,
                    episode_count: 7,
                    air_date: None,
                    poster_path: None,
                },
                SeasonSummary {
                    season_number: 2,
                    name: Some("Season Two".to_string()),
                    episode_count: 13,
                    air_date: Some("2009-03-08".to_string()),
                    poster_path: Some("/s2.jpg".to_string()),
                },
            ],
            genres: vec![],
            vote_average: None,
        }
    }

    #[test]
    fn test_normalize_seasons_fills_defaults() {
        let show = breaking_bad();

        let seasons = normalize_seasons(&show);
        assert_eq!(seasons[0].name.as_deref(), Some("Season 1"));
        assert_eq!(seasons[0].air_date.as_deref(), Some("2008-01-20"));
        assert_eq!(seasons[0].poster_path.as_deref(), Some("/show.jpg"));
        assert_eq!(seasons[1].name.as_deref(), Some("Season Two"));
        assert_eq!(seasons[1].poster_path.as_deref(), Some("/s2.jpg"));
    }

    #[test]
    fn test_normalize_seasons_treats_empty_strings_as_missing() {
        let mut show = breaking_bad();
        show.seasons = vec![SeasonSummary {
            season_number: 0,
            name: Some(String::new()),
            episode_count: 3,
            air_date: Some(String::new()),
            poster_path: Some(String::new()),
        }];

        let seasons = normalize_seasons(&show);
        assert_eq!(seasons[0].name.as_deref(), Some("Season 0"));
        assert_eq!(seasons[0].air_date.as_deref(), Some("2008-01-20"));
        assert_eq!(seasons[0].poster_path.as_deref(), Some("/show.jpg"));

        // Nothing to fall back to
        show.first_air_date = Some(String::new());
        show.poster_path = None;
        let seasons = normalize_seasons(&show);
        assert_eq!(seasons[0].air_date, None);
        assert_eq!(seasons[0].poster_path, None);
    }
}
