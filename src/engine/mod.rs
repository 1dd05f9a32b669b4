pub mod fetch;
pub mod pagination;
pub mod sort;
pub mod view;
