//! Catalog listing: filtering, price sort, and page arithmetic.
//!
//! The store keeps its own iteration order; listing always filters, then
//! sorts, then slices, so page boundaries are stable for a given snapshot.

use serde::{Deserialize, Serialize};

use shopcore_core::{DomainError, DomainResult};

use crate::product::Product;

/// Price sort direction for a listing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSort {
    Ascending,
    Descending,
    #[default]
    Unsorted,
}

impl PriceSort {
    /// Parse the `sort` query parameter; anything unrecognized means unsorted.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Ascending,
            Some("desc") => Self::Descending,
            _ => Self::Unsorted,
        }
    }
}

/// Category/availability filter.
///
/// Both fields set means both must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub available: Option<bool>,
}

impl ProductFilter {
    /// Interpret the free-form `query` parameter: the literals `true`/`false`
    /// select on availability, anything else names a category.
    pub fn parse_query(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::default(),
            Some("true") => Self {
                available: Some(true),
                ..Self::default()
            },
            Some("false") => Self {
                available: Some(false),
                ..Self::default()
            },
            Some(category) => Self {
                category: Some(category.to_string()),
                ..Self::default()
            },
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(available) = self.available {
            if product.available != available {
                return false;
            }
        }
        true
    }
}

/// A validated page request (1-based page number).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: u32, limit: u32) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::validation("page must be >= 1"));
        }
        if limit == 0 {
            return Err(DomainError::validation("limit must be >= 1"));
        }
        Ok(Self { page, limit })
    }

    pub fn first() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of products plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl ProductPage {
    pub fn has_prev(&self) -> bool {
        self.prev_page.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Filter, sort, and slice a catalog snapshot into one page.
///
/// `total_pages` is at least 1 even for an empty result; a page past the end
/// yields an empty item list with prev/next computed against the real total.
pub fn paginate(
    products: Vec<Product>,
    filter: &ProductFilter,
    sort: PriceSort,
    request: PageRequest,
) -> ProductPage {
    let mut matched: Vec<Product> = products.into_iter().filter(|p| filter.matches(p)).collect();

    match sort {
        PriceSort::Ascending => matched.sort_by_key(|p| p.price),
        PriceSort::Descending => matched.sort_by_key(|p| core::cmp::Reverse(p.price)),
        PriceSort::Unsorted => {}
    }

    let limit = request.limit() as usize;
    let total_pages = (matched.len().div_ceil(limit)).max(1) as u32;
    let page = request.page();

    let start = (page as usize - 1).saturating_mul(limit);
    let items: Vec<Product> = matched.into_iter().skip(start).take(limit).collect();

    ProductPage {
        items,
        page,
        total_pages,
        prev_page: (page > 1).then(|| page - 1),
        next_page: (page < total_pages).then(|| page + 1),
    }
}
