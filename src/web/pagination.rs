use async_trait::async_trait;
use serde::Deserialize;

use crate::error::RepoError;

/// Raw `?page=` parameter, kept as text so garbage degrades to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn number(&self) -> i64 {
        parse_page(self.page.as_deref())
    }
}

/// Absent, non-numeric and non-positive values all mean page 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Something that can count and slice the results of a query.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Query: Sync;

    async fn count(&self, query: &Self::Query) -> Result<i64, RepoError>;
    async fn fetch(
        &self,
        query: &Self::Query,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self::Item>, RepoError>;
}

/// A bounded, ordered slice plus the metadata needed to render a pager.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

pub async fn paginate<S>(
    source: &S,
    query: &S::Query,
    page: i64,
    per_page: i64,
) -> Result<Page<S::Item>, RepoError>
where
    S: PageSource + ?Sized,
{
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = source.count(query).await?;
    let offset = (page - 1).saturating_mul(per_page);
    let items = if offset >= total {
        Vec::new()
    } else {
        source.fetch(query, per_page, offset).await?
    };
    Ok(Page {
        items,
        page,
        per_page,
        total,
    })
}
