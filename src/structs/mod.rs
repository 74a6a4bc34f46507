pub mod customer_request;
pub mod qr_code_request;
pub mod qr_request;
