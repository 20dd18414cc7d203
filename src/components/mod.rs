//! UI Components
//!
//! Shared building blocks plus one module per page.

mod delete_confirm_button;
mod error_boundary;
mod error_dialog;
mod file_uploader;
pub mod form_field;
mod layout;
pub mod pages;
mod pagination_bar;
mod search_input;
mod table;
mod toast_host;

pub use delete_confirm_button::DeleteConfirmButton;
pub use error_boundary::AppErrorBoundary;
pub use error_dialog::ErrorDialog;
pub use file_uploader::FileUploader;
pub use form_field::{FormField, TextField};
pub use layout::{Layout, NavLink};
pub use pagination_bar::PaginationBar;
pub use search_input::SearchInput;
pub use table::{PageError, SortHeader, StatusBadge, TableStatusRow};
pub use toast_host::ToastHost;
