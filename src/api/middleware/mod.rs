pub mod request_trace;

pub use request_trace::{REQUEST_ID_HEADER, RequestId, RequestTrace};
