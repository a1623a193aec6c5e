/// Weak metadata captured before an article is visited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    /// Link text or title seen on the listing page
    pub title: Option<String>,

    /// Author markup found near the listing link
    pub author: Option<String>,

    /// Publish time from listing markup or the collection endpoint
    pub time: Option<String>,
}

impl Seed {
    /// Returns true if no seed field is populated
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.time.is_none()
    }
}

/// An article URL queued for a visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleReference {
    /// Absolute article URL
    pub url: String,

    /// Fallback metadata used when resolution fails or omits a field
    pub seed: Seed,
}

impl ArticleReference {
    /// Creates a reference with no seed data
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            seed: Seed::default(),
        }
    }

    /// Creates a reference carrying seed data
    pub fn with_seed(url: impl Into<String>, seed: Seed) -> Self {
        Self {
            url: url.into(),
            seed,
        }
    }
}
