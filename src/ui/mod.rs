pub mod agenda;
pub mod month_view;
