mod client;
mod request;

pub use client::{Dispatch, HttpClient, RawResponse};
pub use request::{
    OutboundRequest, append_query, assemble, build_auth_header, build_content_type_header,
    collect_enabled, encode_query,
};
