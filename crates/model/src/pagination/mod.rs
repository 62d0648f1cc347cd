pub mod cursor;
pub mod page;
pub mod paging_config;
