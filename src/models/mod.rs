pub mod requests;
pub mod response;
pub mod short_url;

pub use requests::{ClicksQuery, LinkRequest};
pub use response::{ClicksResponse, CreatedLink, ErrorResponse, FieldError, ShortUrlResponse};
pub use short_url::{Click, NewShortUrl, ShortUrl, TimePeriod};
