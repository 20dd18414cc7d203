//! Pages, one per route

mod customer_form;
mod customers;
mod dashboard;
mod employee_form;
mod employees;
mod forgot_password;
mod job_detail;
mod jobs;
mod login;
mod not_found;
mod quote_form;
mod quotes;

pub use customer_form::CustomerFormPage;
pub use customers::CustomersPage;
pub use dashboard::DashboardPage;
pub use employee_form::EmployeeFormPage;
pub use employees::EmployeesPage;
pub use forgot_password::ForgotPasswordPage;
pub use job_detail::JobDetailPage;
pub use jobs::JobsPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use quote_form::QuoteFormPage;
pub use quotes::QuotesPage;
