pub mod csrf;
pub mod flash;
pub mod form;
pub mod html;
pub mod i18n;
pub mod pagination;
