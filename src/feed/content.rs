use std::path::Path;

use anyhow::Context;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;

/// One article, as far as the feed is concerned.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentItem {
    pub title: String,
    pub pub_date: DateTime<Utc>,
    pub description: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    /// File stem; the article lives at `/blog/{slug}/`
    pub slug: String,
    pub draft: bool,
}

/// TOML between the two `+++` lines at the top of an article.
#[derive(Deserialize)]
struct FrontMatter {
    title: String,
    pub_date: String,
    #[serde(default)]
    description: String,
    author: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    draft: bool,
}

/// `YYYY-MM-DD` (midnight UTC) or full RFC 3339.
fn parse_date(s: &str) -> Result<DateTime<Utc>, anyhow::Error> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid pub_date {s:?}"))?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .context("Midnight does not exist")?
        .and_utc())
}

/// Parse one article. The body after the front matter is ignored.
pub fn parse_item(
    slug: &str,
    source: &str,
) -> Result<ContentItem, anyhow::Error> {
    let rest = source
        .trim_start()
        .strip_prefix("+++")
        .context("No front matter (expected a leading `+++` line)")?;
    let (front, _body) = rest
        .split_once("\n+++")
        .context("Front matter is not closed with `+++`")?;

    let fm: FrontMatter = toml::from_str(front).context("Invalid front matter")?;

    Ok(ContentItem {
        title: fm.title,
        pub_date: parse_date(&fm.pub_date)?,
        description: fm.description,
        author: fm.author,
        tags: fm.tags,
        slug: slug.to_string(),
        draft: fm.draft,
    })
}

/// Read every `*.md` file directly under `dir`.
#[tracing::instrument(name = "Loading articles", skip_all, fields(dir = %dir.display()))]
pub async fn load_items(dir: &Path) -> Result<Vec<ContentItem>, anyhow::Error> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Could not read content dir {}", dir.display()))?;

    let mut items = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let source = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Could not read {}", path.display()))?;
        let item =
            parse_item(slug, &source).with_context(|| format!("In {}", path.display()))?;
        items.push(item);
    }

    tracing::debug!(count = items.len(), "Loaded articles");
    Ok(items)
}
