pub mod render;
pub mod workbook;
