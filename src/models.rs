use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct HackerNewsItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub comment_count: u32,
    pub points: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl HackerNewsItem {
    /// Link to open when the title is clicked. Ask/Show posts carry no URL,
    /// so those fall back to the discussion page.
    pub fn link(&self) -> String {
        if self.url.is_empty() {
            format!("https://news.ycombinator.com/item?id={}", self.id)
        } else {
            self.url.clone()
        }
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        match self.created_at {
            Some(created) => format_age(now.signed_duration_since(created)),
            None => String::new(),
        }
    }
}

/// Everything accumulated so far for one search term.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub hits: Vec<HackerNewsItem>,
    pub page: u32,
    pub fetched_at: DateTime<Utc>,
}

// Wire format of `GET /search`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<ApiHit>,
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApiHit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub num_comments: Option<u32>,
    pub points: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ApiHit> for HackerNewsItem {
    fn from(hit: ApiHit) -> Self {
        let decode = |s: Option<String>| {
            s.map(|s| html_escape::decode_html_entities(&s).to_string())
                .unwrap_or_default()
        };

        Self {
            id: hit.object_id,
            title: decode(hit.title),
            author: decode(hit.author),
            url: hit.url.unwrap_or_default(),
            comment_count: hit.num_comments.unwrap_or(0),
            points: hit.points.unwrap_or(0),
            created_at: hit.created_at,
        }
    }
}

pub fn format_age(age: chrono::Duration) -> String {
    let minutes = age.num_minutes().max(0);
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if minutes < 60 * 24 {
        plural(minutes / 60, "hour")
    } else if minutes < 60 * 24 * 365 {
        plural(minutes / (60 * 24), "day")
    } else {
        plural(minutes / (60 * 24 * 365), "year")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn null_fields_default_to_empty() {
        let body = r#"{
            "hits": [
                {"objectID": "42", "title": null, "author": "pg", "url": null,
                 "num_comments": null, "points": null, "created_at": "2018-01-01T10:00:00.000Z"}
            ],
            "page": 0
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let item: HackerNewsItem = response.hits.into_iter().next().unwrap().into();

        assert_eq!(item.id, "42");
        assert_eq!(item.title, "");
        assert_eq!(item.author, "pg");
        assert_eq!(item.comment_count, 0);
        assert_eq!(item.points, 0);
        assert_eq!(item.created_at, Some(Utc.with_ymd_and_hms(2018, 1, 1, 10, 0, 0).unwrap()));
    }

    #[test]
    fn title_entities_are_decoded() {
        let body = r#"{"hits": [{"objectID": "1", "title": "Rust &amp; Redux"}], "page": 3}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.page, 3);
        let item: HackerNewsItem = response.hits.into_iter().next().unwrap().into();
        assert_eq!(item.title, "Rust & Redux");
    }

    #[test]
    fn link_falls_back_to_discussion_page() {
        let item = HackerNewsItem {
            id: "7".to_string(),
            title: "Ask HN: anything".to_string(),
            author: "someone".to_string(),
            url: String::new(),
            comment_count: 0,
            points: 0,
            created_at: None,
        };
        assert_eq!(item.link(), "https://news.ycombinator.com/item?id=7");
    }

    #[test]
    fn ages_are_humanized() {
        assert_eq!(format_age(chrono::Duration::seconds(20)), "just now");
        assert_eq!(format_age(chrono::Duration::minutes(1)), "1 minute ago");
        assert_eq!(format_age(chrono::Duration::hours(5)), "5 hours ago");
        assert_eq!(format_age(chrono::Duration::days(3)), "3 days ago");
        assert_eq!(format_age(chrono::Duration::days(800)), "2 years ago");
    }
}
