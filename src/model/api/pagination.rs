use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};

use crate::Config;

/// Page size used when no [`Config`] is managed.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-based page of results, taken from the `page` query parameter.
/// The page size comes from the application [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_num: u32,
    page_size: u32,
}

impl Pagination {
    pub fn new(page_num: u32, page_size: u32) -> Self {
        Self {
            page_num,
            page_size,
        }
    }

    pub fn page_num(&self) -> u32 {
        self.page_num
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items before this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page_num.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Whether this page contains any of `total` items.
    pub fn in_range(&self, total: u64) -> bool {
        self.page_num >= 1 && self.skip() < total
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Pagination {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let page_num = match req.query_value::<u32>("page").unwrap_or(Ok(1)) {
            Ok(0) => return request::Outcome::Failure((Status::UnprocessableEntity, ())),
            Ok(page_num) => page_num,
            Err(_) => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        let page_size = req
            .rocket()
            .state::<Config>()
            .map(Config::questions_per_page)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        request::Outcome::Success(Self::new(page_num, page_size))
    }
}
