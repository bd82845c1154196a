use crate::domain::error::DomainError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 4;

/// 1-based page window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidInput("page must be at least 1".into()));
        }
        if per_page < 1 {
            return Err(DomainError::InvalidInput(
                "per_page must be at least 1".into(),
            ));
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Never less than 1, even for an empty result set.
    pub fn total_pages(&self, total: i64) -> i64 {
        let pages = total / self.per_page + i64::from(total % self.per_page != 0);
        pages.max(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}
