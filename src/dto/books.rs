use serde::Serialize;

use crate::query::ListParams;

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl Pagination {
    pub fn new(params: &ListParams, total_records: usize) -> Self {
        Self {
            current_page: params.page,
            page_size: params.page_size,
            total_pages: total_records.div_ceil(params.page_size),
            total_records,
        }
    }
}
