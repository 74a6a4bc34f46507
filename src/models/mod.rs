pub mod customer;
pub mod design;
pub mod qr_record;
pub mod style;
