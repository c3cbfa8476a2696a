use crate::error::{ServiceError, ServiceResult};

/// A `[skip, skip + limit)` slice over a primary-key ordered table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

impl Window {
    pub fn from_skip_limit(skip: i64, limit: i64) -> ServiceResult<Self> {
        if skip < 0 {
            return Err(ServiceError::InvalidArgument(format!("skip must be >= 0, got {skip}")));
        }
        if limit <= 0 {
            return Err(ServiceError::InvalidArgument(format!("limit must be > 0, got {limit}")));
        }
        Ok(Self { skip: skip as u64, limit: limit as u64 })
    }

    /// 1-based page numbering.
    pub fn from_page(page: i64, page_size: i64) -> ServiceResult<Self> {
        if page < 1 {
            return Err(ServiceError::InvalidArgument(format!("page must be >= 1, got {page}")));
        }
        if page_size <= 0 {
            return Err(ServiceError::InvalidArgument(format!(
                "pageSize must be > 0, got {page_size}"
            )));
        }
        let skip = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| ServiceError::InvalidArgument("page is out of range".to_string()))?;
        Ok(Self { skip: skip as u64, limit: page_size as u64 })
    }

    pub fn end(&self) -> u64 {
        self.skip.saturating_add(self.limit)
    }
}

#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub window: Window,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.window.end() < self.total
    }

    pub fn next_window(&self) -> Option<Window> {
        self.has_next().then(|| Window { skip: self.window.end(), limit: self.window.limit })
    }

    pub fn current_page(&self) -> u64 {
        self.window.skip / self.window.limit + 1
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.window.limit)
    }
}
