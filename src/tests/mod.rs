pub mod common;

mod token_endpoint_http;
