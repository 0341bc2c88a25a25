use super::schema::Assignment;

pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

/// Filters accepted by every list operation. Empty means the whole table.
#[derive(Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub filters: Vec<Assignment>,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
impl ListQuery {
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }
}
