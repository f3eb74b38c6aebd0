//! Limit/offset pagination shared by every list endpoint

use serde::Serialize;

use crate::types::{ContentServiceError, Result};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 1000;
pub const MAX_OFFSET: u64 = 2_147_483_647;

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Build a page request; a zero limit falls back to the default
    pub fn new(limit: u64, offset: u64) -> Result<Self> {
        if limit > MAX_LIMIT {
            return Err(ContentServiceError::Validation(format!(
                "limit should be at most {MAX_LIMIT}"
            )));
        }
        if offset > MAX_OFFSET {
            return Err(ContentServiceError::Validation(format!(
                "offset should be at most {MAX_OFFSET}"
            )));
        }

        Ok(Self {
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            offset,
        })
    }

    /// Parse raw query-string values
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self> {
        Self::new(parse_u64("limit", limit)?, parse_u64("offset", offset)?)
    }
}

fn parse_u64(name: &str, raw: Option<&str>) -> Result<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value.parse().map_err(|_| {
            ContentServiceError::Validation(format!("{name} must be a non-negative integer"))
        }),
    }
}

/// Pagination metadata returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    #[serde(rename = "isLastPage")]
    pub is_last_page: bool,
}

impl Pagination {
    pub fn new(total: u64, page: PageRequest) -> Self {
        Self {
            total,
            limit: page.limit,
            offset: page.offset,
            is_last_page: page.offset.saturating_add(page.limit) >= total,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
