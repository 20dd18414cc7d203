//! REST Resource
//!
//! Generic plumbing for talking to a paginated REST backend:
//! - transport: the HTTP seam (`reqwest` in production)
//! - client: base URL, bearer auth, envelope decoding, refresh-and-retry
//! - service: CRUD for any [`RestResource`]
//! - list_state: list reducer with request-generation tokens
//! - session, debounce, upload: supporting state machines

mod client;
mod debounce;
mod envelope;
mod error;
mod list_state;
mod query;
mod service;
mod session;
mod transport;
mod upload;

pub use client::{ApiClient, ApiRequest, LOGIN_PATH, REFRESH_PATH};
pub use debounce::Debouncer;
pub use envelope::{Envelope, ListData, Page, Pagination, PaginationMeta};
pub use error::{ApiError, ErrorBody, ErrorCode, ErrorKind, TransportError};
pub use list_state::{FetchTicket, ListState, RequestGeneration, RequestStatus, SEARCH_FILTER};
pub use query::{Filters, ListQuery, Sort, SortDirection};
pub use service::{ResourceService, RestResource, DEFAULT_PREFIX};
pub use session::{
    MemoryStorage, Session, SessionContext, SessionStorage, TokenGrant, ACCESS_TOKEN_KEY,
    EMAIL_KEY, EXPIRES_IN_KEY, REFRESH_TOKEN_KEY, TOKEN_TYPE_KEY, USER_KEY,
};
pub use transport::{FormPart, HttpRequest, HttpResponse, Method, ReqwestTransport, RequestBody, Transport};
#[cfg(any(test, feature = "testing"))]
pub use transport::mock::MockTransport;
pub use upload::{
    discard_temp, format_file_size, upload_temp, validate_file, FileMeta, FileValidation,
    SlotState, TempUpload, UploadRules, UploadSlot, UPLOAD_TEMP_PATH,
};
