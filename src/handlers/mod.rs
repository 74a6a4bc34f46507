pub mod customer_handlers;
pub mod design_handlers;
pub mod health_handlers;
pub mod qr_code_handlers;
pub mod qr_handlers;
