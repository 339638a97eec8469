mod request;
mod response;

pub use request::{AuthType, BodyKind, HttpMethod, KeyValue, RequestSpec};
pub use response::ResponseSummary;
