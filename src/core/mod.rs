pub mod logging;

// Content synthesis engine: outline, chart/table data, long-form text
pub mod book_gen;

// Page-image document export
pub mod export;
